// ==========================================
// 库存增量同步 - 基线 Repository
// ==========================================
// 职责: 读取 / 整体覆盖上次运行的规范化库存表
// 红线: 所有运行读写同一个固定槽位（不按文件、不按批次）
// 已知限制: 读-写之间无锁、无版本号，并发运行为 last-writer-wins
// ==========================================

use crate::domain::inventory::InventoryRecord;
use crate::exporter::csv_export::render_discontinued;
use crate::repository::error::StorageResult;
use crate::repository::object_store::{ObjectStore, PutObject};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

// ==========================================
// BaselineRepository Trait
// ==========================================
#[async_trait]
pub trait BaselineRepository: Send + Sync {
    /// 读取基线
    ///
    /// # 返回
    /// - Ok(vec![]): 基线不存在（冷启动），不是错误
    /// - Err: 其他存储错误
    async fn load(&self) -> StorageResult<Vec<InventoryRecord>>;

    /// 用本次完整规范化结果整体覆盖基线
    async fn save(&self, records: &[InventoryRecord], request_id: &str) -> StorageResult<()>;
}

// ==========================================
// BaselineEntry - 持久化格式
// ==========================================
// 沿用下游导入列名，兼容历史快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineEntry {
    #[serde(rename = "Variant Barcode")]
    pub barcode: String,

    // 历史快照里可能存在负数
    #[serde(rename = "Variant Inventory Qty")]
    pub quantity: i64,

    #[serde(
        rename = "Variant Metafield: custom.internal_discontinued [single_line_text_field]"
    )]
    pub discontinued: String,

    #[serde(
        rename = "Variant Inventory Tracker",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tracker: Option<String>,

    #[serde(
        rename = "Variant Inventory Policy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub policy: Option<String>,
}

impl BaselineEntry {
    pub fn from_record(record: &InventoryRecord, tracker: &str, policy: &str) -> Self {
        Self {
            barcode: record.identifier.clone(),
            quantity: i64::try_from(record.quantity).unwrap_or(i64::MAX),
            discontinued: render_discontinued(record.discontinued).to_string(),
            tracker: Some(tracker.to_string()),
            policy: Some(policy.to_string()),
        }
    }

    pub fn into_record(self) -> InventoryRecord {
        InventoryRecord {
            identifier: self.barcode.trim().to_string(),
            quantity: u64::try_from(self.quantity).unwrap_or(0),
            discontinued: self.discontinued.trim().eq_ignore_ascii_case("yes"),
        }
    }
}

/// 序列化基线为 JSON（带缩进，便于人工排查）
pub fn encode_baseline(
    records: &[InventoryRecord],
    tracker: &str,
    policy: &str,
) -> serde_json::Result<Vec<u8>> {
    let entries: Vec<BaselineEntry> = records
        .iter()
        .map(|r| BaselineEntry::from_record(r, tracker, policy))
        .collect();
    serde_json::to_vec_pretty(&entries)
}

/// 反序列化基线 JSON
pub fn decode_baseline(bytes: &[u8]) -> serde_json::Result<Vec<InventoryRecord>> {
    let entries: Vec<BaselineEntry> = serde_json::from_slice(bytes)?;
    Ok(entries.into_iter().map(BaselineEntry::into_record).collect())
}

// ==========================================
// ObjectBaselineRepository - 对象存储实现
// ==========================================
pub struct ObjectBaselineRepository {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    key: String,
    processed_by: String,
    tracker: String,
    policy: String,
}

impl ObjectBaselineRepository {
    /// # 参数
    /// - store: 对象存储
    /// - bucket / key: 基线槽位
    /// - processed_by: 写入元数据中的处理方标识
    /// - tracker / policy: 快照中附带的常量列
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        key: impl Into<String>,
        processed_by: impl Into<String>,
        tracker: impl Into<String>,
        policy: impl Into<String>,
    ) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            key: key.into(),
            processed_by: processed_by.into(),
            tracker: tracker.into(),
            policy: policy.into(),
        }
    }
}

#[async_trait]
impl BaselineRepository for ObjectBaselineRepository {
    async fn load(&self) -> StorageResult<Vec<InventoryRecord>> {
        let bytes = match self.store.get_object(&self.bucket, &self.key).await {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => {
                info!(key = %self.key, "基线不存在，按冷启动处理");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let records = decode_baseline(&bytes)?;
        info!(key = %self.key, records = records.len(), "基线读取完成");
        Ok(records)
    }

    async fn save(&self, records: &[InventoryRecord], request_id: &str) -> StorageResult<()> {
        let body = encode_baseline(records, &self.tracker, &self.policy)?;
        let object = PutObject::new(body, "application/json")
            .with_metadata("processed-by", self.processed_by.as_str())
            .with_metadata("processed-at", Utc::now().to_rfc3339())
            .with_metadata("request-id", request_id)
            .with_metadata("record-count", records.len().to_string());

        self.store.put_object(&self.bucket, &self.key, object).await?;
        info!(key = %self.key, records = records.len(), "基线已覆盖");
        Ok(())
    }
}
