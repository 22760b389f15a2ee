use crate::error::BusinessError;
use serde::{Deserialize, Serialize};

/// 提交记录中的领域标签
pub const DOMAIN: &str = "law";

/// 分析模式记录中的难度标签
pub const ANALYZE_LEVEL: &str = "Analyze";

/// 问题评审项
pub const QUESTION_RUBRIC: [&str; 3] = [
    "Câu hỏi độc lập và dễ hiểu mà không cần phải đọc qua tài liệu.",
    "Câu hỏi không chứa thông tin sai lệch, không có trong văn bản.",
    "Câu hỏi không cứa các từ tham chiếu không rõ ràng.",
];

/// 答案评审项
pub const ANSWER_RUBRIC: [&str; 3] = [
    "Câu trả lời chính xác và đầy đủ",
    "Câu trả lời không chứa thông tin sai lệch, không có trong văn bản.",
    "Câu trả lời không cứa các từ tham chiếu không rõ ràng.",
];

/// 引用评审项
pub const CITATION_RUBRIC: [&str; 1] = ["Trích dẫn chính xác từng chữ, liên quan và đầy đủ."];

/// 轻微修改时需要说明的修改项
pub const FIX_RUBRIC: [&str; 3] = [
    "Cần viết lại câu hỏi (giữ nguyên nội dung được hỏi, có thể thêm một vài thông tin bổ sung) cho phù hợp.",
    "Cần viết lại câu trả lời (giữ nguyên nội dung, có thể thêm một vài thông tin bổ sung) cho phù hợp.",
    "Cần viết lại trích dẫn cho phù hợp",
];

/// 评分类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Grading {
    /// 问题与难度不符（未选择时的默认值）
    #[default]
    #[serde(rename = "Câu hỏi không phù hợp với mức độ ❌")]
    LevelMismatch,
    /// 文档不可能产生此类问题
    #[serde(rename = "Bài báo không có khả năng tạo ra loại câu hỏi này ❌")]
    UnsupportedBySource,
    /// 无需修改
    #[serde(rename = "Không Cần Chỉnh Sửa ✅")]
    NoEdit,
    /// 轻微修改（提交前必须改完）
    #[serde(rename = "Cần Chỉnh Sửa Nhẹ ✅ - *Bạn cần chỉnh sửa hết các lỗi sai trước khi Submit*")]
    MinorEdit,
    /// 大量修改
    #[serde(
        rename = "Cần chỉnh Sửa Nhiều ✅- *Câu hỏi hiện tại không khả thi, nhưng nó cung cấp cho bạn ý tưởng để tạo ra các câu hỏi và câu trả lời tương tự.*"
    )]
    MajorEdit,
    /// 无法修改
    #[serde(
        rename = "Không thể chỉnh sửa ❌ - *câu hỏi và câu trả lời không gợi bất kỳ ý tưởng nào và đòi hỏi phải nghĩ ra câu hỏi-câu trả lời mới khác hoàn toàn so với bản gốc.*"
    )]
    Unfixable,
}

impl Grading {
    /// 按界面显示顺序排列的全部类别
    pub const ALL: [Grading; 6] = [
        Grading::LevelMismatch,
        Grading::UnsupportedBySource,
        Grading::NoEdit,
        Grading::MinorEdit,
        Grading::MajorEdit,
        Grading::Unfixable,
    ];

    /// 获取显示文本（与提交记录中保存的字符串一致）
    pub fn label(self) -> &'static str {
        match self {
            Grading::LevelMismatch => "Câu hỏi không phù hợp với mức độ ❌",
            Grading::UnsupportedBySource => "Bài báo không có khả năng tạo ra loại câu hỏi này ❌",
            Grading::NoEdit => "Không Cần Chỉnh Sửa ✅",
            Grading::MinorEdit => {
                "Cần Chỉnh Sửa Nhẹ ✅ - *Bạn cần chỉnh sửa hết các lỗi sai trước khi Submit*"
            }
            Grading::MajorEdit => {
                "Cần chỉnh Sửa Nhiều ✅- *Câu hỏi hiện tại không khả thi, nhưng nó cung cấp cho bạn ý tưởng để tạo ra các câu hỏi và câu trả lời tương tự.*"
            }
            Grading::Unfixable => {
                "Không thể chỉnh sửa ❌ - *câu hỏi và câu trả lời không gợi bất kỳ ý tưởng nào và đòi hỏi phải nghĩ ra câu hỏi-câu trả lời mới khác hoàn toàn so với bản gốc.*"
            }
        }
    }

    /// 是否需要填写修改项
    pub fn requires_fix_details(self) -> bool {
        self == Grading::MinorEdit
    }

    /// 从完整文本或界面序号（从 1 开始）解析
    pub fn parse(input: &str) -> Result<Self, BusinessError> {
        let input = input.trim();
        if let Ok(number) = input.parse::<usize>() {
            if (1..=Self::ALL.len()).contains(&number) {
                return Ok(Self::ALL[number - 1]);
            }
        }
        Self::ALL
            .into_iter()
            .find(|grading| grading.label() == input)
            .ok_or_else(|| BusinessError::UnknownGrading {
                input: input.to_string(),
            })
    }
}

impl std::fmt::Display for Grading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 引用信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// 法规名称
    pub source: Option<String>,
    /// 引用原文
    pub sentences: String,
    /// 解析后的文档路径
    pub file_path: String,
}

/// 人工评审结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaHuman {
    pub question: [bool; 3],
    pub answer: [bool; 3],
    pub citation: [bool; 1],
    pub grading: Grading,
    /// 仅在轻微修改时存在；其余类别下该字段不出现在记录中
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_correct: Option<[bool; 3]>,
}

/// 提交记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub question: String,
    pub answer: String,
    pub citation: Citation,
    /// 在当前筛选结果中的位置
    pub index: usize,
    pub level: String,
    pub domain: String,
    pub topic: String,
    pub meta_human: MetaHuman,
}

/// 分析模式中引用的一篇文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub source: Option<String>,
    pub file_path: String,
}

/// 分析模式提交记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRecord {
    pub question: String,
    pub answer: String,
    pub citation: Vec<SourceRef>,
    pub level: String,
    pub domain: String,
    pub topic: String,
}

/// 写入文档库的文档：记录本身 + 用时
#[derive(Debug, Clone, Serialize)]
pub struct TimedSubmission<'a, R: Serialize> {
    #[serde(flatten)]
    pub record: &'a R,
    pub time_taken_seconds: f64,
}

impl<'a, R: Serialize> TimedSubmission<'a, R> {
    pub fn new(record: &'a R, time_taken_seconds: f64) -> Self {
        Self {
            record,
            time_taken_seconds,
        }
    }
}
