// ==========================================
// 库存增量同步 - 核心库
// ==========================================
// 技术栈: Rust + calamine/csv + SQLite
// 系统定位: 库存表格 → 规范化 → 基线对比 → 批量导入文件
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部表格
pub mod importer;

// 引擎层 - 变更计算与流水线编排
pub mod engine;

// 导出层 - 下游 CSV
pub mod exporter;

// 数据仓储层 - 对象存储与基线
pub mod repository;

// 配置层 - 流水线配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 运行指标
pub mod metrics;

// 故障通知
pub mod notifier;

// 应用层 - 事件处理
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{ChangeType, DeltaRecord, DeltaSummary, InventoryRecord, ProcessingMode};

// 引擎
pub use engine::{DeltaEngine, FileReport, InventoryPipeline, PipelineError, PipelineResult};

// 应用
pub use app::{AppState, BatchReport, EventHandler, StorageEvent};

// 配置
pub use config::PipelineConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存增量同步";
