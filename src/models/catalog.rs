use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// 题目表中的一行（已关联法规名称）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// 行号（从 0 开始），即题目在表中的唯一编号
    #[serde(skip_deserializing)]
    pub index: usize,
    pub topic: String,
    pub level: String,
    pub file_path: String,
    /// 法规名称，元数据中没有对应 file_path 时为 None
    #[serde(skip_deserializing)]
    pub key_name: Option<String>,
    #[serde(rename = "Q")]
    pub q: String,
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "C")]
    pub c: String,
}

impl CatalogItem {
    /// file_path 的最后一段（文件名）
    pub fn file_name(&self) -> &str {
        self.file_path.rsplit('/').next().unwrap_or(&self.file_path)
    }
}

/// 法规元数据条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub file_path: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// 法规元数据：key_name -> 条目
pub type MetadataIndex = BTreeMap<String, SourceMetadata>;

/// 题库（题目表 + 法规名称）
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// 使用已关联好的行构建题库，index 按位置重新编号
    pub fn new(mut items: Vec<CatalogItem>) -> Self {
        for (index, item) in items.iter_mut().enumerate() {
            item.index = index;
        }
        Self { items }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    /// 所有主题，排序去重
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self
            .items
            .iter()
            .map(|item| item.topic.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        topics.sort();
        topics
    }

    /// 所有难度，按首次出现的顺序去重
    pub fn levels(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .filter(|item| seen.insert(item.level.as_str()))
            .map(|item| item.level.clone())
            .collect()
    }

    /// 筛选出匹配主题（及难度）的题目编号，升序且不重复
    pub fn matching_indices(&self, topic: &str, level: Option<&str>) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .items
            .iter()
            .filter(|item| item.topic == topic)
            .filter(|item| level.map_or(true, |level| item.level == level))
            .map(|item| item.index)
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
