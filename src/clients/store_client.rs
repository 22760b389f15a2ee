/// 文档库客户端
///
/// 封装所有与文档库的交互：建立连接、插入文档、关闭连接
use async_trait::async_trait;
use mongodb::bson::{self, Bson, Document};
use mongodb::options::{ClientOptions, Credential, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, StoreError};

/// 插入回执
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertReceipt {
    pub inserted_id: String,
}

/// 已建立的文档库连接
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 插入一条文档
    async fn insert_one(&self, document: Value) -> AppResult<InsertReceipt>;

    /// 释放连接
    async fn close(self: Box<Self>);
}

/// 负责建立连接
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> AppResult<Box<dyn DocumentStore>>;
}

// ========== MongoDB ==========

/// 通过 MongoDB 驱动连接集群
pub struct MongoStoreConnector {
    config: Config,
}

impl MongoStoreConnector {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    async fn client_options(&self) -> AppResult<ClientOptions> {
        let (username, password) = self.config.store_credentials()?;
        let endpoint = &self.config.store_uri;

        let mut options = ClientOptions::parse(endpoint)
            .await
            .map_err(|e| AppError::store_driver_failed(endpoint, e))?;
        options.credential = Some(
            Credential::builder()
                .username(username)
                .password(password)
                .build(),
        );
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        options.server_selection_timeout = Some(Duration::from_secs(self.config.store_timeout_secs));
        Ok(options)
    }
}

#[async_trait]
impl StoreConnector for MongoStoreConnector {
    async fn connect(&self) -> AppResult<Box<dyn DocumentStore>> {
        let endpoint = self.config.store_uri.clone();
        info!(
            "🔌 正在连接文档库: {} / {}.{}",
            endpoint, self.config.store_database, self.config.store_collection
        );

        let options = self.client_options().await?;
        let client = Client::with_options(options)
            .map_err(|e| AppError::store_driver_failed(&endpoint, e))?;
        let collection = client
            .database(&self.config.store_database)
            .collection::<Document>(&self.config.store_collection);

        Ok(Box::new(MongoDocumentStore {
            client,
            collection,
            endpoint,
        }))
    }
}

/// MongoDB 连接
pub struct MongoDocumentStore {
    client: Client,
    collection: Collection<Document>,
    endpoint: String,
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn insert_one(&self, document: Value) -> AppResult<InsertReceipt> {
        let document = bson::to_document(&document).map_err(StoreError::from)?;
        debug!("插入文档: {}", document);

        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|e| AppError::store_driver_failed(&self.endpoint, e))?;

        Ok(InsertReceipt {
            inserted_id: inserted_id_to_string(&result.inserted_id),
        })
    }

    async fn close(self: Box<Self>) {
        let MongoDocumentStore {
            client, endpoint, ..
        } = *self;
        client.shutdown().await;
        info!("🔌 已关闭文档库连接: {}", endpoint);
    }
}

/// ObjectId 取十六进制，其他类型原样输出
fn inserted_id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ========== 内存文档库 ==========

/// 进程内文档库，插入的文档保存在共享列表中
#[derive(Clone, Default)]
pub struct MemoryStoreConnector {
    documents: Arc<Mutex<Vec<Value>>>,
    connections: Arc<Mutex<usize>>,
    closed: Arc<Mutex<usize>>,
    fail_inserts: bool,
}

impl MemoryStoreConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次插入都失败，用于验证失败后可重试
    pub fn failing() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    /// 已插入的文档
    pub fn documents(&self) -> Vec<Value> {
        self.documents.lock().map(|docs| docs.clone()).unwrap_or_default()
    }

    /// 建立过的连接数
    pub fn connection_count(&self) -> usize {
        self.connections.lock().map(|n| *n).unwrap_or_default()
    }

    /// 关闭过的连接数
    pub fn close_count(&self) -> usize {
        self.closed.lock().map(|n| *n).unwrap_or_default()
    }
}

#[async_trait]
impl StoreConnector for MemoryStoreConnector {
    async fn connect(&self) -> AppResult<Box<dyn DocumentStore>> {
        if let Ok(mut n) = self.connections.lock() {
            *n += 1;
        }
        Ok(Box::new(MemoryDocumentStore {
            shared: self.clone(),
        }))
    }
}

/// 进程内文档库连接
pub struct MemoryDocumentStore {
    shared: MemoryStoreConnector,
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(&self, document: Value) -> AppResult<InsertReceipt> {
        if self.shared.fail_inserts {
            return Err(StoreError::ConnectionFailed {
                endpoint: "memory".to_string(),
                message: "insert rejected".to_string(),
            }
            .into());
        }
        let mut docs = self.shared.documents.lock().map_err(|_| StoreError::Closed)?;
        docs.push(document);
        Ok(InsertReceipt {
            inserted_id: format!("mem-{}", docs.len()),
        })
    }

    async fn close(self: Box<Self>) {
        match self.shared.closed.lock() {
            Ok(mut n) => *n += 1,
            Err(_) => warn!("⚠️ 内存文档库计数器不可用"),
        }
        debug!("内存文档库连接已关闭");
    }
}
