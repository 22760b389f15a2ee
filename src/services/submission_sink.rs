//! 提交服务 - 业务能力层
//!
//! 只负责"把一条记录写入文档库"能力：
//! - 第一次提交时才建立连接，之后复用
//! - 提交时附加用时
//! - 会话结束时关闭连接（显式 close 或 Drop，二者只会生效一次）

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clients::{DocumentStore, InsertReceipt, StoreConnector};
use crate::error::{AppResult, StoreError};
use crate::models::TimedSubmission;

/// 提交服务
pub struct SubmissionSink {
    connector: Box<dyn StoreConnector>,
    connection: Option<Box<dyn DocumentStore>>,
}

impl SubmissionSink {
    pub fn new(connector: Box<dyn StoreConnector>) -> Self {
        Self {
            connector,
            connection: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// 获取连接，不存在时建立
    pub async fn connect(&mut self) -> AppResult<&dyn DocumentStore> {
        if self.connection.is_none() {
            let store = self.connector.connect().await?;
            info!("✓ 文档库连接已建立");
            self.connection = Some(store);
        }
        self.connection
            .as_deref()
            .ok_or_else(|| StoreError::Closed.into())
    }

    /// 提交一条记录
    ///
    /// # 参数
    /// - `record`: 提交记录，不会被修改
    /// - `shown_at`: 当前题目开始显示的时间
    ///
    /// # 返回
    /// 返回插入回执；失败时原样返回文档库错误
    pub async fn submit<R: Serialize>(
        &mut self,
        record: &R,
        shown_at: DateTime<Local>,
    ) -> AppResult<InsertReceipt> {
        let time_taken_seconds = elapsed_since(shown_at, Local::now());
        let document = serde_json::to_value(TimedSubmission::new(record, time_taken_seconds))
            .map_err(StoreError::from)?;

        let store = self.connect().await?;
        let receipt = store.insert_one(document).await?;

        info!(
            "✓ 提交成功: {} (用时 {:.1} 秒)",
            receipt.inserted_id, time_taken_seconds
        );
        Ok(receipt)
    }

    /// 关闭连接；未连接或已关闭时什么也不做
    pub async fn close(&mut self) {
        if let Some(store) = self.connection.take() {
            store.close().await;
        } else {
            debug!("没有需要关闭的文档库连接");
        }
    }
}

impl Drop for SubmissionSink {
    /// 未显式关闭时，把关闭交给当前运行时
    fn drop(&mut self) {
        let Some(store) = self.connection.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(store.close());
            }
            Err(_) => warn!("⚠️ 没有可用的运行时，文档库连接直接释放"),
        }
    }
}

/// 经过的秒数，不会为负
pub fn elapsed_since(start: DateTime<Local>, now: DateTime<Local>) -> f64 {
    (now - start).num_milliseconds().max(0) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MemoryStoreConnector;
    use crate::error::AppError;
    use chrono::Duration;
    use serde_json::json;

    #[tokio::test]
    async fn test_connect_is_lazy_and_reused() {
        let connector = MemoryStoreConnector::new();
        let mut sink = SubmissionSink::new(Box::new(connector.clone()));
        assert!(!sink.is_connected());
        assert_eq!(connector.connection_count(), 0);

        sink.submit(&json!({"question": "Q1"}), Local::now()).await.unwrap();
        sink.submit(&json!({"question": "Q2"}), Local::now()).await.unwrap();

        assert_eq!(connector.connection_count(), 1);
        assert_eq!(connector.documents().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_attaches_time_taken() {
        let connector = MemoryStoreConnector::new();
        let mut sink = SubmissionSink::new(Box::new(connector.clone()));
        let shown_at = Local::now() - Duration::seconds(3);

        sink.submit(&json!({"question": "Q"}), shown_at).await.unwrap();

        let doc = &connector.documents()[0];
        assert_eq!(doc["question"], "Q");
        let taken = doc["time_taken_seconds"].as_f64().unwrap();
        assert!(taken >= 3.0);
    }

    #[tokio::test]
    async fn test_failed_insert_surfaces_store_error() {
        let mut sink = SubmissionSink::new(Box::new(MemoryStoreConnector::failing()));
        let err = sink.submit(&json!({}), Local::now()).await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
    }

    #[tokio::test]
    async fn test_close_runs_once() {
        let connector = MemoryStoreConnector::new();
        let mut sink = SubmissionSink::new(Box::new(connector.clone()));
        sink.connect().await.unwrap();
        sink.close().await;
        sink.close().await;
        drop(sink);

        assert_eq!(connector.close_count(), 1);
    }

    #[tokio::test]
    async fn test_drop_closes_open_connection() {
        let connector = MemoryStoreConnector::new();
        {
            let mut sink = SubmissionSink::new(Box::new(connector.clone()));
            sink.connect().await.unwrap();
        }

        for _ in 0..10 {
            if connector.close_count() == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(connector.close_count(), 1);
    }

    #[test]
    fn test_drop_outside_runtime_releases_without_close() {
        let connector = MemoryStoreConnector::new();
        let mut sink = SubmissionSink::new(Box::new(connector.clone()));
        tokio_test::block_on(sink.connect()).unwrap();
        drop(sink);

        assert_eq!(connector.connection_count(), 1);
        assert_eq!(connector.close_count(), 0);
    }

    #[test]
    fn test_elapsed_since_clamps_to_zero() {
        let now = Local::now();
        assert_eq!(elapsed_since(now + Duration::seconds(5), now), 0.0);
        assert_eq!(elapsed_since(now - Duration::milliseconds(250), now), 0.25);
    }
}
