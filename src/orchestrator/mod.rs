//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 持有会话，把终端输入翻译成会话操作，再把会话状态渲染出来。
//!
//! ## 模块划分
//!
//! - `app` - 应用生命周期（初始化、交互循环、关闭连接）
//! - `command` - 把一行输入解析为一个操作
//! - `render` - 把会话状态格式化为文本
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (终端输入 / 输出)
//!     ↓
//! workflow::ReviewSession / AnalyzeSession (会话状态)
//!     ↓
//! services (能力层：navigator / presenter / form_assembler / submission_sink)
//!     ↓
//! clients (文档库) + models (题库加载)
//! ```

pub mod app;
pub mod command;
pub mod render;

pub use app::{App, CommandHandler, Flow};
pub use command::Command;
