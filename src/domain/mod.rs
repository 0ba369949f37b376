// ==========================================
// 库存增量同步 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod inventory;
pub mod types;

// 重导出核心类型
pub use inventory::{CellValue, DeltaRecord, DeltaSummary, InventoryRecord, RawSheet};
pub use types::{ChangeType, ProcessingMode};
