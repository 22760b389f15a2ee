//! 评审表单 - 业务能力层
//!
//! 把编辑后的文本、评审项勾选和评分类别组装成一条提交记录。
//! 组装过程只依赖入参，不读取任何其他状态。

use crate::error::BusinessError;
use crate::models::review::{Citation, Grading, MetaHuman, SubmissionRecord, DOMAIN};
use crate::services::presenter::ItemView;

/// 评审项分组
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckGroup {
    Question,
    Answer,
    Citation,
    /// 轻微修改时的修改项
    Fix,
}

impl CheckGroup {
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "q" | "question" => Some(CheckGroup::Question),
            "a" | "answer" => Some(CheckGroup::Answer),
            "c" | "citation" => Some(CheckGroup::Citation),
            "f" | "fix" => Some(CheckGroup::Fix),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CheckGroup::Question => "question",
            CheckGroup::Answer => "answer",
            CheckGroup::Citation => "citation",
            CheckGroup::Fix => "fix",
        }
    }
}

/// 当前表单状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewForm {
    pub question: String,
    pub answer: String,
    pub citation: String,
    pub question_checks: [bool; 3],
    pub answer_checks: [bool; 3],
    pub citation_checks: [bool; 1],
    pub grading: Grading,
    /// 只有评分为轻微修改时才会写入记录
    pub fix_checks: [bool; 3],
}

impl ReviewForm {
    /// 用题目内容初始化表单，勾选项全部清空
    pub fn from_view(view: &ItemView) -> Self {
        Self {
            question: view.question.clone(),
            answer: view.answer.clone(),
            citation: view.citation_text.clone(),
            ..Self::default()
        }
    }

    /// 切换某一项勾选（编号从 1 开始），返回切换后的值
    pub fn toggle(&mut self, group: CheckGroup, number: usize) -> Result<bool, BusinessError> {
        let checks: &mut [bool] = match group {
            CheckGroup::Question => &mut self.question_checks,
            CheckGroup::Answer => &mut self.answer_checks,
            CheckGroup::Citation => &mut self.citation_checks,
            CheckGroup::Fix => &mut self.fix_checks,
        };
        let slot = number
            .checked_sub(1)
            .and_then(|i| checks.get_mut(i))
            .ok_or_else(|| BusinessError::UnknownCheck {
                group: group.name().to_string(),
                number,
            })?;
        *slot = !*slot;
        Ok(*slot)
    }
}

/// 组装提交记录
///
/// # 参数
/// - `form`: 当前表单
/// - `view`: 当前题目（提供难度、法规名称和文档路径）
/// - `cursor`: 在筛选结果中的位置
/// - `topic`: 当前选择的主题
pub fn assemble(form: &ReviewForm, view: &ItemView, cursor: usize, topic: &str) -> SubmissionRecord {
    SubmissionRecord {
        question: form.question.clone(),
        answer: form.answer.clone(),
        citation: Citation {
            source: view.citation_source.clone(),
            sentences: form.citation.clone(),
            file_path: view.document.path_string(),
        },
        index: cursor,
        level: view.level.clone(),
        domain: DOMAIN.to_string(),
        topic: topic.to_string(),
        meta_human: MetaHuman {
            question: form.question_checks,
            answer: form.answer_checks,
            citation: form.citation_checks,
            grading: form.grading,
            reason_correct: form
                .grading
                .requires_fix_details()
                .then_some(form.fix_checks),
        },
    }
}
