// ==========================================
// 库存增量同步 - SQLite 基线 Repository
// ==========================================
// 职责: 基线快照存入 baseline_snapshot 表（单行，slot_key 固定）
// 策略: INSERT OR REPLACE 整体覆盖
// ==========================================

use crate::db::{init_baseline_schema, open_sqlite_connection};
use crate::domain::inventory::InventoryRecord;
use crate::repository::baseline_repo::{decode_baseline, encode_baseline, BaselineRepository};
use crate::repository::error::{StorageError, StorageResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::info;

pub struct SqliteBaselineRepository {
    conn: Arc<Mutex<Connection>>,
    slot_key: String,
    tracker: String,
    policy: String,
}

impl SqliteBaselineRepository {
    /// 创建新的 Repository 实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - slot_key: 基线槽位键
    pub fn new(
        db_path: &str,
        slot_key: impl Into<String>,
        tracker: impl Into<String>,
        policy: impl Into<String>,
    ) -> StorageResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)), slot_key, tracker, policy)
    }

    /// 从已有连接创建
    pub fn from_connection(
        conn: Arc<Mutex<Connection>>,
        slot_key: impl Into<String>,
        tracker: impl Into<String>,
        policy: impl Into<String>,
    ) -> StorageResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| StorageError::Lock(e.to_string()))?;
            init_baseline_schema(&guard)?;
        }

        Ok(Self {
            conn,
            slot_key: slot_key.into(),
            tracker: tracker.into(),
            policy: policy.into(),
        })
    }
}

#[async_trait]
impl BaselineRepository for SqliteBaselineRepository {
    async fn load(&self) -> StorageResult<Vec<InventoryRecord>> {
        let payload: Option<String> = {
            let conn = self
                .conn
                .lock()
                .map_err(|e| StorageError::Lock(e.to_string()))?;
            conn.query_row(
                "SELECT payload FROM baseline_snapshot WHERE slot_key = ?1",
                params![self.slot_key],
                |row| row.get(0),
            )
            .optional()?
        };

        match payload {
            None => {
                info!(slot = %self.slot_key, "基线不存在，按冷启动处理");
                Ok(Vec::new())
            }
            Some(json) => {
                let records = decode_baseline(json.as_bytes())?;
                info!(slot = %self.slot_key, records = records.len(), "基线读取完成");
                Ok(records)
            }
        }
    }

    async fn save(&self, records: &[InventoryRecord], request_id: &str) -> StorageResult<()> {
        let payload = encode_baseline(records, &self.tracker, &self.policy)?;
        let payload = String::from_utf8(payload)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO baseline_snapshot (
                slot_key, payload, record_count, saved_at, request_id
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                self.slot_key,
                payload,
                records.len() as i64,
                Utc::now().to_rfc3339(),
                request_id,
            ],
        )?;

        info!(slot = %self.slot_key, records = records.len(), "基线已覆盖");
        Ok(())
    }
}
