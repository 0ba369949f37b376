// ==========================================
// 库存增量同步 - 存储事件模型
// ==========================================
// 格式: 对象存储通知 (Records[].s3.bucket.name / Records[].s3.object.key)
// 说明: 对象键为 URL 编码，`+` 表示空格
// ==========================================

use crate::engine::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntity {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// 待处理对象（键已解码）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl StorageEvent {
    /// 解析事件 JSON
    pub fn from_json(bytes: &[u8]) -> PipelineResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| PipelineError::InvalidEvent(e.to_string()))
    }

    /// 由 (bucket, 原始键) 构造事件（CLI 使用，键按未编码处理）
    pub fn from_objects<I, B, K>(objects: I) -> Self
    where
        I: IntoIterator<Item = (B, K)>,
        B: Into<String>,
        K: AsRef<str>,
    {
        let records = objects
            .into_iter()
            .map(|(bucket, key)| EventRecord {
                s3: S3Entity {
                    bucket: BucketEntity { name: bucket.into() },
                    object: ObjectEntity {
                        key: urlencoding::encode(key.as_ref()).into_owned(),
                        size: None,
                    },
                },
            })
            .collect();
        Self { records }
    }

    /// 解码后的对象列表（保持事件顺序）
    pub fn objects(&self) -> PipelineResult<Vec<ObjectRef>> {
        self.records
            .iter()
            .map(|record| {
                Ok(ObjectRef {
                    bucket: record.s3.bucket.name.clone(),
                    key: decode_object_key(&record.s3.object.key)?,
                })
            })
            .collect()
    }
}

/// 解码对象键：先把 `+` 还原为空格，再做百分号解码
pub fn decode_object_key(raw: &str) -> PipelineResult<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| PipelineError::InvalidEvent(format!("对象键解码失败 ({}): {}", raw, e)))
}
