// ==========================================
// 内存对象存储 - 用于集成测试
// ==========================================
// 支持按对象键前缀注入读写故障
// ==========================================

use async_trait::async_trait;
use inventory_sync::repository::{ObjectStore, PutObject, StorageError, StorageResult};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<(String, String), PutObject>>,
    failing_puts: Mutex<HashSet<String>>,
    failing_gets: Mutex<HashSet<String>>,
    put_log: Mutex<Vec<String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置输入文件
    pub fn insert(&self, bucket: &str, key: &str, body: Vec<u8>) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            PutObject::new(body, "application/octet-stream"),
        );
    }

    /// 之后对该前缀下的写入全部失败
    pub fn fail_puts_under(&self, prefix: &str) {
        self.failing_puts.lock().unwrap().insert(prefix.to_string());
    }

    /// 之后对该前缀下的读取全部失败（非 NotFound）
    pub fn fail_gets_under(&self, prefix: &str) {
        self.failing_gets.lock().unwrap().insert(prefix.to_string());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<PutObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn body_text(&self, bucket: &str, key: &str) -> Option<String> {
        self.object(bucket, key)
            .map(|o| String::from_utf8(o.body).unwrap())
    }

    pub fn keys_with_prefix(&self, bucket: &str, prefix: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .map(|(_, k)| k.clone())
            .collect()
    }

    /// 成功写入的键（按写入顺序）
    pub fn put_log(&self) -> Vec<String> {
        self.put_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        if matches_any(&self.failing_gets, key) {
            return Err(StorageError::Io(format!("注入读取故障: {}", key)));
        }
        self.object(bucket, key)
            .map(|o| o.body)
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn put_object(&self, bucket: &str, key: &str, object: PutObject) -> StorageResult<()> {
        if matches_any(&self.failing_puts, key) {
            return Err(StorageError::Io(format!("注入写入故障: {}", key)));
        }
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), object);
        self.put_log.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

fn matches_any(prefixes: &Mutex<HashSet<String>>, key: &str) -> bool {
    prefixes
        .lock()
        .unwrap()
        .iter()
        .any(|prefix| key.starts_with(prefix.as_str()))
}
