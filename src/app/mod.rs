// ==========================================
// 库存增量同步 - 应用层
// ==========================================
// 职责: 存储事件 → 批次处理，组装运行所需组件
// ==========================================

pub mod event;
pub mod handler;
pub mod state;

// 重导出
pub use event::{decode_object_key, ObjectRef, StorageEvent};
pub use handler::{BatchReport, EventHandler, FileResult};
pub use state::{build_baseline_repository, AppState};
