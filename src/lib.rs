//! # Law Review
//!
//! 法律领域问答数据集的人工评审工具
//!
//! 评审人按主题和难度浏览自动生成的（问题、答案、引用）三元组，
//! 查看原文文档，修改文本，按固定评审项打分，然后提交到文档库。
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models / Clients）
//! - `models/` - 题库、评分类别、提交记录；`loaders/` 负责读取 CSV 和元数据
//! - `clients/` - 文档库连接（MongoDB / 内存）
//!
//! ### ② 业务能力层（Services）
//! - `Navigator` - 筛选与翻页
//! - `presenter` - 题目展示与文档定位
//! - `form_assembler` - 组装提交记录
//! - `SubmissionSink` - 懒连接并提交
//!
//! ### ③ 流程层（Workflow）
//! - `ReviewSession` - 评分模式的会话状态
//! - `AnalyzeSession` - 分析模式的会话状态
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 终端交互循环
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Catalog, CatalogItem, Grading, SubmissionRecord};
pub use orchestrator::App;
pub use services::{Navigator, ReviewForm, SubmissionSink};
pub use workflow::{AnalyzeSession, ReviewSession};
