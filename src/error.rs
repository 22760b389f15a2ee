use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 数据集结构错误
    #[error("数据加载错误: {0}")]
    Load(#[from] LoadError),
    /// 文档库错误
    #[error("文档库错误: {0}")]
    Store(#[from] StoreError),
    /// 业务逻辑错误
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// CSV 解析失败
    #[error("CSV解析失败 ({path}): {source}")]
    CsvParseFailed {
        path: String,
        #[source]
        source: csv::Error,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 数据集结构错误
#[derive(Debug, Error)]
pub enum LoadError {
    /// 缺少必需的列
    #[error("{path} 缺少必需的列: {column}")]
    MissingColumn { path: String, column: String },
    /// 元数据条目缺少 file_path
    #[error("{path} 中的条目 {key_name} 缺少 file_path 字符串")]
    MetadataWithoutFilePath { path: String, key_name: String },
}

/// 文档库错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 连接失败
    #[error("无法连接文档库 ({endpoint}): {message}")]
    ConnectionFailed { endpoint: String, message: String },
    /// 驱动返回错误（选择服务器超时、认证失败、写入被拒绝等）
    #[error("文档库操作失败 ({endpoint}): {source}")]
    Driver {
        endpoint: String,
        #[source]
        source: mongodb::error::Error,
    },
    /// 记录无法转换为 BSON 文档
    #[error("记录转换为 BSON 失败: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    /// 序列化失败
    #[error("记录序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
    /// 连接已关闭
    #[error("文档库连接已关闭")]
    Closed,
}

/// 业务逻辑错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BusinessError {
    /// 索引超出范围
    #[error("索引 {index} 超出范围 [0, {max_index}]")]
    IndexOutOfRange { index: usize, max_index: usize },
    /// 当前筛选条件下没有题目
    #[error("当前筛选条件下没有题目")]
    EmptyView,
    /// 题目数量不足
    #[error("题目数量不足: 需要 {required} 个, 实际 {actual} 个")]
    NotEnoughItems { required: usize, actual: usize },
    /// 评分类别无法解析
    #[error("无法解析评分类别: {input}")]
    UnknownGrading { input: String },
    /// 复选框编号无效
    #[error("{group} 没有第 {number} 项")]
    UnknownCheck { group: String, number: usize },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            AppError::File(FileError::NotFound { path })
        } else {
            AppError::File(FileError::ReadFailed { path, source })
        }
    }

    /// 创建文档库驱动错误
    pub fn store_driver_failed(endpoint: impl Into<String>, source: mongodb::error::Error) -> Self {
        AppError::Store(StoreError::Driver {
            endpoint: endpoint.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
