//! 评分会话 - 流程层
//!
//! 一个评审人的完整会话状态：筛选条件、游标、表单和文档库连接。
//! 每个界面操作对应一个方法，调用方持有会话并逐个调用。

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clients::InsertReceipt;
use crate::error::{AppResult, BusinessError, StoreError};
use crate::models::{Catalog, Grading, SubmissionRecord};
use crate::services::{
    assemble, present, CheckGroup, DocumentRoots, ItemView, Navigator, Progress, ReviewForm,
    SubmissionSink,
};

/// 评分会话
pub struct ReviewSession {
    catalog: Arc<Catalog>,
    roots: DocumentRoots,
    navigator: Navigator,
    topic: Option<String>,
    level: Option<String>,
    form: ReviewForm,
    /// 表单当前对应的题目编号
    form_item: Option<usize>,
    sink: SubmissionSink,
}

impl ReviewSession {
    /// 创建会话，默认选中第一个主题和第一个难度
    pub fn new(catalog: Arc<Catalog>, roots: DocumentRoots, sink: SubmissionSink) -> Self {
        let topic = catalog.topics().into_iter().next();
        let level = catalog.levels().into_iter().next();
        let mut session = Self {
            catalog,
            roots,
            navigator: Navigator::new(),
            topic,
            level,
            form: ReviewForm::default(),
            form_item: None,
            sink,
        };
        session.apply_filter();
        session
    }

    // ========== 筛选 ==========

    pub fn topics(&self) -> Vec<String> {
        self.catalog.topics()
    }

    pub fn levels(&self) -> Vec<String> {
        self.catalog.levels()
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }

    pub fn select_topic(&mut self, topic: impl Into<String>) {
        self.topic = Some(topic.into());
        self.apply_filter();
    }

    pub fn select_level(&mut self, level: impl Into<String>) {
        self.level = Some(level.into());
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        let Some(topic) = self.topic.as_deref() else {
            return;
        };
        if self
            .navigator
            .set_filter(&self.catalog, topic, self.level.as_deref())
        {
            info!(
                "📋 主题: {} | 难度: {} | 共 {} 题",
                topic,
                self.level.as_deref().unwrap_or("-"),
                self.navigator.view().len()
            );
        }
        self.sync_form();
    }

    // ========== 导航 ==========

    pub fn previous(&mut self) {
        self.navigator.previous();
        self.sync_form();
    }

    pub fn next(&mut self) {
        self.navigator.next();
        self.sync_form();
    }

    /// 滑块跳转，不重新计时
    pub fn jump(&mut self, position: usize) -> Result<(), BusinessError> {
        self.navigator.jump_to(position)?;
        self.sync_form();
        Ok(())
    }

    pub fn progress(&self) -> Option<Progress> {
        self.navigator.progress()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// 当前题目的展示内容；筛选结果为空时为 None
    pub fn current_view(&self) -> Option<ItemView> {
        let index = self.navigator.current_index()?;
        self.catalog.get(index).map(|item| present(item, &self.roots))
    }

    /// 显示的题目变化时，用新题目重置表单
    fn sync_form(&mut self) {
        let current = self.navigator.current_index();
        if current == self.form_item {
            return;
        }
        self.form_item = current;
        self.form = match self.current_view() {
            Some(view) => {
                if !view.document.found {
                    warn!("⚠️ 题目 {} 的原文文档未找到: {}", view.index, view.document.path.display());
                }
                ReviewForm::from_view(&view)
            }
            None => ReviewForm::default(),
        };
        debug!("表单已重置为题目 {:?}", current);
    }

    // ========== 表单 ==========

    pub fn form(&self) -> &ReviewForm {
        &self.form
    }

    pub fn edit_question(&mut self, text: impl Into<String>) {
        self.form.question = text.into();
    }

    pub fn edit_answer(&mut self, text: impl Into<String>) {
        self.form.answer = text.into();
    }

    pub fn edit_citation(&mut self, text: impl Into<String>) {
        self.form.citation = text.into();
    }

    pub fn toggle_check(&mut self, group: CheckGroup, number: usize) -> Result<bool, BusinessError> {
        self.form.toggle(group, number)
    }

    /// 选择评分类别；不需要修改项的类别会清空修改项
    pub fn set_grading(&mut self, grading: Grading) {
        self.form.grading = grading;
        if !grading.requires_fix_details() {
            self.form.fix_checks = [false; 3];
        }
    }

    // ========== 提交 ==========

    /// 用当前表单组装提交记录
    pub fn build_record(&self) -> Result<SubmissionRecord, BusinessError> {
        let view = self.current_view().ok_or(BusinessError::EmptyView)?;
        let topic = self.topic.as_deref().unwrap_or_default();
        Ok(assemble(&self.form, &view, self.navigator.cursor(), topic))
    }

    /// 预览提交记录（格式化的 JSON）
    pub fn preview(&self) -> AppResult<String> {
        let record = self.build_record()?;
        let json = serde_json::to_string_pretty(&record).map_err(StoreError::from)?;
        Ok(json)
    }

    /// 提交当前表单
    ///
    /// 失败时表单保持不变，可以直接重试
    pub async fn submit(&mut self) -> AppResult<InsertReceipt> {
        let record = self.build_record()?;
        self.sink.submit(&record, self.navigator.shown_at()).await
    }

    pub fn is_connected(&self) -> bool {
        self.sink.is_connected()
    }

    /// 结束会话并关闭文档库连接
    pub async fn shutdown(mut self) {
        info!("👋 评分会话结束");
        self.sink.close().await;
    }
}
