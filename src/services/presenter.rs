//! 题目展示 - 业务能力层
//!
//! 取出当前题目的可编辑字段，并在两个存储目录中查找对应的原文文档

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::CatalogItem;

/// 文档存储目录，按顺序查找
#[derive(Debug, Clone)]
pub struct DocumentRoots {
    pub primary: PathBuf,
    pub secondary: PathBuf,
}

impl DocumentRoots {
    pub fn new(primary: impl Into<PathBuf>, secondary: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.doc_root_primary, &config.doc_root_secondary)
    }

    /// 按文件名查找文档
    ///
    /// 先查主目录，找不到则返回第二个目录下的路径（无论是否存在）
    pub fn resolve(&self, file_name: &str) -> ResolvedDocument {
        let primary = self.primary.join(file_name);
        if primary.exists() {
            debug!("文档位于主目录: {}", primary.display());
            return ResolvedDocument {
                path: primary,
                found: true,
            };
        }

        let secondary = self.secondary.join(file_name);
        let found = secondary.exists();
        if !found {
            warn!("⚠️ 两个目录中都找不到文档: {}", file_name);
        }
        ResolvedDocument {
            path: secondary,
            found,
        }
    }
}

/// 文档查找结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    pub path: PathBuf,
    /// 文件是否真实存在；为 false 时界面显示"未找到"
    pub found: bool,
}

impl ResolvedDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// 当前题目的展示内容
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub index: usize,
    pub topic: String,
    pub level: String,
    pub question: String,
    pub answer: String,
    pub citation_text: String,
    pub citation_source: Option<String>,
    /// 原文文件名（不含目录）
    pub file_name: String,
    pub document: ResolvedDocument,
}

/// 生成题目的展示内容
pub fn present(item: &CatalogItem, roots: &DocumentRoots) -> ItemView {
    ItemView {
        index: item.index,
        topic: item.topic.clone(),
        level: item.level.clone(),
        question: item.q.clone(),
        answer: item.a.clone(),
        citation_text: item.c.clone(),
        citation_source: item.key_name.clone(),
        file_name: item.file_name().to_string(),
        document: roots.resolve(item.file_name()),
    }
}
