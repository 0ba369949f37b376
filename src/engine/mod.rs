// ==========================================
// 库存增量同步 - 引擎层
// ==========================================
// 职责: 变更计算 + 单文件流水线编排
// 红线: Engine 不直接读写文件，所有 I/O 经由仓储层
// ==========================================

pub mod delta;
pub mod error;
pub mod orchestrator;

// 重导出核心引擎
pub use delta::{DeltaEngine, REASON_DELETED, REASON_DISCONTINUED_CHANGED, REASON_NEW};
pub use error::{PipelineError, PipelineResult};
pub use orchestrator::{output_key, FileReport, InventoryPipeline};
