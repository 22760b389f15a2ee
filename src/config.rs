use crate::error::{AppResult, ConfigError};
use std::path::PathBuf;
use std::str::FromStr;

/// 评审模式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewMode {
    /// 按主题 + 难度逐条评分
    Grade,
    /// 按主题随机抽取两篇文档，人工出题
    Analyze,
}

impl FromStr for ReviewMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grade" => Ok(ReviewMode::Grade),
            "analyze" => Ok(ReviewMode::Analyze),
            _ => Err(()),
        }
    }
}

/// 文档库后端
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// MongoDB 集群
    Mongo,
    /// 仅保存在进程内（试运行）
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mongo" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(()),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 评审模式
    pub mode: ReviewMode,
    /// 题目表（CSV）
    pub catalog_path: PathBuf,
    /// 法规元数据（JSON）
    pub metadata_path: PathBuf,
    /// 文档存放目录，按顺序查找
    pub doc_root_primary: PathBuf,
    pub doc_root_secondary: PathBuf,
    // --- 文档库配置 ---
    pub store_backend: StoreBackend,
    /// 集群地址（不含凭据）
    pub store_uri: String,
    pub store_database: String,
    pub store_collection: String,
    /// 选择服务器的超时时间
    pub store_timeout_secs: u64,
    pub store_username: Option<String>,
    pub store_password: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ReviewMode::Grade,
            catalog_path: PathBuf::from("combined_law_data.csv"),
            metadata_path: PathBuf::from("law_metadata.json"),
            doc_root_primary: PathBuf::from("law_domain_part1"),
            doc_root_secondary: PathBuf::from("law_domain_part2"),
            store_backend: StoreBackend::Mongo,
            store_uri: "mongodb+srv://cluster0.wbusr.mongodb.net/?retryWrites=true&w=majority&appName=Cluster0"
                .to_string(),
            store_database: "localhost".to_string(),
            store_collection: "Human_check_law_domain".to_string(),
            store_timeout_secs: 30,
            store_username: None,
            store_password: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的变量使用默认值；设置了但无法解析时报错
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意变量来源加载配置
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let default = Self::default();
        let text = |name: &str| lookup(name).filter(|v| !v.is_empty());

        Ok(Self {
            mode: parse_var(&lookup, "REVIEW_MODE", "grade|analyze")?.unwrap_or(default.mode),
            catalog_path: text("REVIEW_CATALOG_PATH").map(PathBuf::from).unwrap_or(default.catalog_path),
            metadata_path: text("REVIEW_METADATA_PATH").map(PathBuf::from).unwrap_or(default.metadata_path),
            doc_root_primary: text("REVIEW_DOC_ROOT_PRIMARY").map(PathBuf::from).unwrap_or(default.doc_root_primary),
            doc_root_secondary: text("REVIEW_DOC_ROOT_SECONDARY").map(PathBuf::from).unwrap_or(default.doc_root_secondary),
            store_backend: parse_var(&lookup, "REVIEW_STORE", "mongo|memory")?.unwrap_or(default.store_backend),
            store_uri: text("STORE_URI").unwrap_or(default.store_uri),
            store_database: text("STORE_DATABASE").unwrap_or(default.store_database),
            store_collection: text("STORE_COLLECTION").unwrap_or(default.store_collection),
            store_timeout_secs: parse_var(&lookup, "STORE_TIMEOUT_SECS", "u64")?.unwrap_or(default.store_timeout_secs),
            store_username: text("MONGO_USERNAME"),
            store_password: text("MONGO_PASSWORD"),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool")?.unwrap_or(default.verbose_logging),
        })
    }

    /// 取出文档库凭据，缺失时报错
    ///
    /// 浏览题目不需要凭据，只有第一次连接文档库时才检查
    pub fn store_credentials(&self) -> AppResult<(String, String)> {
        let username = self.store_username.clone().ok_or_else(|| ConfigError::EnvVarNotFound {
            var_name: "MONGO_USERNAME".to_string(),
        })?;
        let password = self.store_password.clone().ok_or_else(|| ConfigError::EnvVarNotFound {
            var_name: "MONGO_PASSWORD".to_string(),
        })?;
        Ok((username, password))
    }
}

/// 读取并解析一个变量；未设置时返回 None
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(var_name).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        }),
    }
}
