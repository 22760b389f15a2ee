//! 分析会话 - 流程层
//!
//! 只按主题筛选，从该主题中随机抽取两篇不同的文档并排展示，
//! 评审人据此写出一道新的问答，提交时记录两篇文档的来源

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, info};

use crate::clients::InsertReceipt;
use crate::error::{AppResult, BusinessError, StoreError};
use crate::models::review::{ANALYZE_LEVEL, DOMAIN};
use crate::models::{AnalyzeRecord, Catalog, SourceRef};
use crate::services::{present, DocumentRoots, ItemView, Navigator, SubmissionSink};

/// 每次展示的文档数
pub const PAIR_SIZE: usize = 2;

/// 分析会话
pub struct AnalyzeSession {
    catalog: Arc<Catalog>,
    roots: DocumentRoots,
    navigator: Navigator,
    topic: Option<String>,
    pair: Vec<ItemView>,
    question: String,
    answer: String,
    rng: StdRng,
    sink: SubmissionSink,
}

impl AnalyzeSession {
    /// 创建会话，默认选中第一个主题
    pub fn new(catalog: Arc<Catalog>, roots: DocumentRoots, sink: SubmissionSink) -> Self {
        Self::with_rng(catalog, roots, sink, StdRng::from_entropy())
    }

    /// 使用指定的随机数生成器创建会话
    pub fn with_rng(
        catalog: Arc<Catalog>,
        roots: DocumentRoots,
        sink: SubmissionSink,
        rng: StdRng,
    ) -> Self {
        let topic = catalog.topics().into_iter().next();
        let mut session = Self {
            catalog,
            roots,
            navigator: Navigator::new(),
            topic,
            pair: Vec::new(),
            question: String::new(),
            answer: String::new(),
            rng,
            sink,
        };
        session.apply_filter();
        session
    }

    pub fn topics(&self) -> Vec<String> {
        self.catalog.topics()
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// 当前主题下的题目数
    pub fn topic_size(&self) -> usize {
        self.navigator.view().len()
    }

    pub fn select_topic(&mut self, topic: impl Into<String>) {
        self.topic = Some(topic.into());
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        let Some(topic) = self.topic.as_deref() else {
            return;
        };
        if self.navigator.set_filter(&self.catalog, topic, None) {
            info!("📋 主题: {} | 共 {} 题", topic, self.navigator.view().len());
        }
        self.shuffle();
    }

    pub fn previous(&mut self) {
        self.navigator.previous();
        self.shuffle();
    }

    pub fn next(&mut self) {
        self.navigator.next();
        self.shuffle();
    }

    /// 重新随机抽取两篇文档；题目不足两条时清空
    pub fn shuffle(&mut self) {
        let view = self.navigator.view();
        if view.len() < PAIR_SIZE {
            debug!("主题下只有 {} 题，无法抽取", view.len());
            self.pair.clear();
            return;
        }

        let picked = rand::seq::index::sample(&mut self.rng, view.len(), PAIR_SIZE);
        self.pair = picked
            .iter()
            .filter_map(|pos| self.catalog.get(view[pos]))
            .map(|item| present(item, &self.roots))
            .collect();
        debug!(
            "抽取题目: {:?}",
            self.pair.iter().map(|v| v.index).collect::<Vec<_>>()
        );
    }

    /// 当前展示的两篇文档
    pub fn pair(&self) -> &[ItemView] {
        &self.pair
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn edit_question(&mut self, text: impl Into<String>) {
        self.question = text.into();
    }

    pub fn edit_answer(&mut self, text: impl Into<String>) {
        self.answer = text.into();
    }

    pub fn build_record(&self) -> Result<AnalyzeRecord, BusinessError> {
        if self.pair.len() < PAIR_SIZE {
            return Err(BusinessError::NotEnoughItems {
                required: PAIR_SIZE,
                actual: self.topic_size(),
            });
        }
        Ok(AnalyzeRecord {
            question: self.question.clone(),
            answer: self.answer.clone(),
            citation: self
                .pair
                .iter()
                .map(|view| SourceRef {
                    source: view.citation_source.clone(),
                    file_path: view.file_name.clone(),
                })
                .collect(),
            level: ANALYZE_LEVEL.to_string(),
            domain: DOMAIN.to_string(),
            topic: self.topic.clone().unwrap_or_default(),
        })
    }

    pub fn preview(&self) -> AppResult<String> {
        let record = self.build_record()?;
        let json = serde_json::to_string_pretty(&record).map_err(StoreError::from)?;
        Ok(json)
    }

    pub async fn submit(&mut self) -> AppResult<InsertReceipt> {
        let record = self.build_record()?;
        self.sink.submit(&record, self.navigator.shown_at()).await
    }

    pub async fn shutdown(mut self) {
        info!("👋 分析会话结束");
        self.sink.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MemoryStoreConnector;
    use crate::models::catalog::fixtures::{item, tax_labor_catalog};

    fn session_with(catalog: Catalog, connector: &MemoryStoreConnector) -> AnalyzeSession {
        AnalyzeSession::with_rng(
            Arc::new(catalog),
            DocumentRoots::new("/nonexistent/part1", "/nonexistent/part2"),
            SubmissionSink::new(Box::new(connector.clone())),
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn test_pair_is_two_distinct_items_of_topic() {
        let catalog = Catalog::new(vec![
            item("tax", "Remember", "a.pdf"),
            item("tax", "Understand", "b.pdf"),
            item("labor", "Remember", "c.pdf"),
            item("tax", "Analyze", "d.pdf"),
        ]);
        let mut session = session_with(catalog, &MemoryStoreConnector::new());
        session.select_topic("tax");
        assert_eq!(session.topic_size(), 3);

        for _ in 0..20 {
            session.shuffle();
            let pair = session.pair();
            assert_eq!(pair.len(), 2);
            assert_ne!(pair[0].index, pair[1].index);
            assert!(pair.iter().all(|v| v.topic == "tax"));
        }
    }

    #[test]
    fn test_single_item_topic_cannot_be_submitted() {
        let mut session = session_with(tax_labor_catalog(), &MemoryStoreConnector::new());
        session.select_topic("labor");
        assert!(session.pair().is_empty());
        assert_eq!(
            session.build_record(),
            Err(BusinessError::NotEnoughItems {
                required: 2,
                actual: 1
            })
        );
    }

    #[tokio::test]
    async fn test_submit_records_both_sources() {
        let connector = MemoryStoreConnector::new();
        let mut session = session_with(tax_labor_catalog(), &connector);
        session.select_topic("tax");
        session.edit_question("So sánh hai văn bản?");
        session.edit_answer("Khác nhau về phạm vi");

        session.submit().await.unwrap();

        let doc = &connector.documents()[0];
        assert_eq!(doc["level"], "Analyze");
        assert_eq!(doc["domain"], "law");
        assert_eq!(doc["topic"], "tax");
        assert_eq!(doc["question"], "So sánh hai văn bản?");
        let citation = doc["citation"].as_array().unwrap();
        assert_eq!(citation.len(), 2);
        let mut files: Vec<_> = citation
            .iter()
            .map(|c| c["file_path"].as_str().unwrap().to_string())
            .collect();
        files.sort();
        assert_eq!(files, vec!["luat_thue.pdf", "nghi_dinh_thue.pdf"]);
        assert!(doc["time_taken_seconds"].as_f64().unwrap() >= 0.0);
    }
}
