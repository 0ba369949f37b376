// ==========================================
// 库存增量同步 - 对象存储 Repository
// ==========================================
// 职责: 按 (bucket, key) 读写原始文件 / 导出文件 / 基线快照
// 红线: Repository 不含业务规则，只做读写
// ==========================================

use crate::repository::error::{StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// 元数据 sidecar 文件后缀
const METADATA_SUFFIX: &str = ".meta.json";

// ==========================================
// PutObject - 写入请求
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutObject {
    pub body: Vec<u8>,
    pub content_type: String,
    pub metadata: BTreeMap<String, String>,
}

impl PutObject {
    pub fn new(body: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            body,
            content_type: content_type.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// ==========================================
// ObjectStore Trait
// ==========================================
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 读取对象内容
    ///
    /// # 返回
    /// - Err(StorageError::NotFound): 对象不存在
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// 写入对象（存在则覆盖）
    async fn put_object(&self, bucket: &str, key: &str, object: PutObject) -> StorageResult<()>;
}

// ==========================================
// LocalObjectStore - 本地目录实现
// ==========================================
// 布局: {root}/{bucket}/{key}，元数据写入 {key}.meta.json
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 对象键 → 本地路径（拒绝绝对路径与 `..`）
    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        let mut path = self.root.clone();
        for part in [bucket, key] {
            let relative = Path::new(part);
            let safe = !part.is_empty()
                && relative
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
            if !safe {
                return Err(StorageError::InvalidKey(format!("{}/{}", bucket, key)));
            }
            path.push(relative);
        }
        Ok(path)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), size = bytes.len(), "读取对象");
                Ok(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_object(&self, bucket: &str, key: &str, object: PutObject) -> StorageResult<()> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&path, &object.body).await?;

        let mut metadata = object.metadata.clone();
        metadata.insert("content-type".to_string(), object.content_type.clone());
        let sidecar = serde_json::to_vec_pretty(&metadata)?;
        let mut sidecar_path = path.clone().into_os_string();
        sidecar_path.push(METADATA_SUFFIX);
        tokio::fs::write(PathBuf::from(sidecar_path), sidecar).await?;

        debug!(path = %path.display(), size = object.body.len(), "写入对象");
        Ok(())
    }
}
