// ==========================================
// 库存增量同步 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: NotFound 单独区分，基线读取时视为冷启动
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("对象不存在: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("非法对象键: {0}")]
    InvalidKey(String),

    #[error("存储读写失败: {0}")]
    Io(String),

    #[error("序列化失败: {0}")]
    Serialization(String),

    #[error("数据库操作失败: {0}")]
    Database(String),

    #[error("数据库锁获取失败: {0}")]
    Lock(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

/// Result 类型别名
pub type StorageResult<T> = Result<T, StorageError>;
