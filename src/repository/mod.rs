// ==========================================
// 库存增量同步 - 数据仓储层
// ==========================================
// 职责: 对象存储读写 + 基线快照持久化
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod baseline_repo;
pub mod error;
pub mod object_store;
pub mod sqlite_baseline_repo;

// 重导出核心仓储
pub use baseline_repo::{BaselineEntry, BaselineRepository, ObjectBaselineRepository};
pub use error::{StorageError, StorageResult};
pub use object_store::{LocalObjectStore, ObjectStore, PutObject};
pub use sqlite_baseline_repo::SqliteBaselineRepository;
