//! 应用主流程 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：加载题库（失败即退出）
//! 2. **会话管理**：按模式创建评分会话或分析会话，持有到程序结束
//! 3. **交互循环**：逐行读取命令，一次只处理一个操作
//! 4. **资源释放**：正常退出、输入结束或 Ctrl-C 时关闭文档库连接

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::clients::{MongoStoreConnector, MemoryStoreConnector, StoreConnector};
use crate::config::{Config, ReviewMode, StoreBackend};
use crate::models::{load_cached, Catalog, CatalogPaths, Grading};
use crate::orchestrator::command::{Command, ParseError, HELP};
use crate::orchestrator::render;
use crate::services::{DocumentRoots, SubmissionSink};
use crate::utils::logging::{log_catalog_loaded, log_startup, log_submit_failed};
use crate::workflow::{AnalyzeSession, ReviewSession};

/// 一次操作后是否继续
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 应用主结构
pub struct App {
    config: Config,
    catalog: Arc<Catalog>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let paths = CatalogPaths::new(&config.catalog_path, &config.metadata_path);
        let catalog = load_cached(&paths).context("无法加载题库")?;
        log_catalog_loaded(&catalog);

        Ok(Self { config, catalog })
    }

    /// 运行交互循环
    pub async fn run(self) -> Result<()> {
        let sink = SubmissionSink::new(build_connector(&self.config));
        let roots = DocumentRoots::from_config(&self.config);

        match self.config.mode {
            ReviewMode::Grade => {
                let mut session = ReviewSession::new(self.catalog.clone(), roots, sink);
                let result = run_loop(&mut session).await;
                session.shutdown().await;
                result
            }
            ReviewMode::Analyze => {
                let mut session = AnalyzeSession::new(self.catalog.clone(), roots, sink);
                let result = run_loop(&mut session).await;
                session.shutdown().await;
                result
            }
        }
    }
}

fn build_connector(config: &Config) -> Box<dyn StoreConnector> {
    match config.store_backend {
        StoreBackend::Mongo => Box::new(MongoStoreConnector::new(config)),
        StoreBackend::Memory => {
            warn!("⚠️ 使用内存文档库，提交内容不会持久保存");
            Box::new(MemoryStoreConnector::new())
        }
    }
}

/// 交互会话：渲染当前状态并处理单个命令
#[async_trait(?Send)]
pub trait CommandHandler {
    fn render(&self) -> String;

    async fn handle(&mut self, command: Command) -> Flow;
}

#[async_trait(?Send)]
impl CommandHandler for ReviewSession {
    fn render(&self) -> String {
        show_grade(self)
    }

    async fn handle(&mut self, command: Command) -> Flow {
        handle_grade(self, command).await
    }
}

#[async_trait(?Send)]
impl CommandHandler for AnalyzeSession {
    fn render(&self) -> String {
        show_analyze(self)
    }

    async fn handle(&mut self, command: Command) -> Flow {
        handle_analyze(self, command).await
    }
}

/// 逐行读取命令直到 quit、输入结束或 Ctrl-C
async fn run_loop<H: CommandHandler>(handler: &mut H) -> Result<()> {
    println!("{}", handler.render());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("读取输入失败")?,
            _ = tokio::signal::ctrl_c() => {
                info!("收到 Ctrl-C，正在退出");
                return Ok(());
            }
        };

        let Some(line) = line else {
            return Ok(());
        };

        match Command::parse(&line) {
            Ok(command) => {
                if handler.handle(command).await == Flow::Quit {
                    return Ok(());
                }
            }
            Err(ParseError::Empty) => {}
            Err(e) => println!("{}", e),
        }
    }
}

fn show_grade(session: &ReviewSession) -> String {
    let topic = session.topic().unwrap_or_default();
    match session.current_view() {
        Some(view) => format!(
            "{}\n{}",
            render::render_item(topic, &view, session.progress().as_ref()),
            render::render_form(session.form())
        ),
        None => format!("Topic: {}\n（当前筛选条件下没有题目）", topic),
    }
}

fn show_analyze(session: &AnalyzeSession) -> String {
    let topic = session.topic().unwrap_or_default();
    let mut out = render::render_pair(topic, session.topic_size(), session.pair());
    if session.pair().is_empty() {
        out.push_str("\n（该主题题目不足两条，无法抽取）");
    }
    out.push_str(&format!(
        "\nQuestion: {}\nAnswer:   {}",
        session.question(),
        session.answer()
    ));
    out
}

async fn handle_grade(session: &mut ReviewSession, command: Command) -> Flow {
    match command {
        Command::Help => println!("{}", HELP),
        Command::Show => println!("{}", show_grade(session)),
        Command::Topics => println!("{}", render::render_list("Topics", &session.topics(), session.topic())),
        Command::Levels => println!("{}", render::render_list("Levels", &session.levels(), session.level())),
        Command::Topic(topic) => {
            session.select_topic(topic);
            println!("{}", show_grade(session));
        }
        Command::Level(level) => {
            session.select_level(level);
            println!("{}", show_grade(session));
        }
        Command::Previous => {
            session.previous();
            println!("{}", show_grade(session));
        }
        Command::Next => {
            session.next();
            println!("{}", show_grade(session));
        }
        Command::Jump(position) => {
            // 滑块只能落在有效范围内
            let max_index = session.navigator().view().len().saturating_sub(1);
            match session.jump(position.min(max_index)) {
                Ok(()) => println!("{}", show_grade(session)),
                Err(e) => println!("{}", e),
            }
        }
        Command::EditQuestion(text) => session.edit_question(text),
        Command::EditAnswer(text) => session.edit_answer(text),
        Command::EditCitation(text) => session.edit_citation(text),
        Command::Check(group, number) => match session.toggle_check(group, number) {
            Ok(checked) => println!("{} {} -> {}", group.name(), number, checked),
            Err(e) => println!("{}", e),
        },
        Command::Gradings => println!("{}", render::render_gradings(session.form().grading)),
        Command::Grade(input) => match Grading::parse(&input) {
            Ok(grading) => {
                session.set_grading(grading);
                println!("Chấm điểm: {}", grading);
            }
            Err(e) => println!("{}", e),
        },
        Command::Shuffle => println!("shuffle 仅在分析模式下可用"),
        Command::Preview => match session.preview() {
            Ok(json) => println!("{}", json),
            Err(e) => println!("{}", e),
        },
        Command::Submit => match session.submit().await {
            Ok(receipt) => println!("InsertOneResult(inserted_id={})", receipt.inserted_id),
            Err(e) => {
                log_submit_failed(&e);
                println!("{}", e);
            }
        },
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

async fn handle_analyze(session: &mut AnalyzeSession, command: Command) -> Flow {
    match command {
        Command::Help => println!("{}", HELP),
        Command::Show => println!("{}", show_analyze(session)),
        Command::Topics => println!("{}", render::render_list("Topics", &session.topics(), session.topic())),
        Command::Topic(topic) => {
            session.select_topic(topic);
            println!("{}", show_analyze(session));
        }
        Command::Previous => {
            session.previous();
            println!("{}", show_analyze(session));
        }
        Command::Next => {
            session.next();
            println!("{}", show_analyze(session));
        }
        Command::Shuffle => {
            session.shuffle();
            println!("{}", show_analyze(session));
        }
        Command::EditQuestion(text) => session.edit_question(text),
        Command::EditAnswer(text) => session.edit_answer(text),
        Command::Preview => match session.preview() {
            Ok(json) => println!("{}", json),
            Err(e) => println!("{}", e),
        },
        Command::Submit => match session.submit().await {
            Ok(receipt) => println!("InsertOneResult(inserted_id={})", receipt.inserted_id),
            Err(e) => {
                log_submit_failed(&e);
                println!("{}", e);
            }
        },
        Command::Quit => return Flow::Quit,
        Command::Levels
        | Command::Level(_)
        | Command::Jump(_)
        | Command::EditCitation(_)
        | Command::Check(..)
        | Command::Gradings
        | Command::Grade(_) => println!("该命令仅在评分模式下可用"),
    }
    Flow::Continue
}
