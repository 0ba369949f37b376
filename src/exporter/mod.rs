// ==========================================
// 库存增量同步 - 导出层
// ==========================================
// 职责: 生成下游批量导入工具使用的 CSV
// ==========================================

pub mod csv_export;
pub mod error;

pub use csv_export::{render_discontinued, CsvExporter, DELTA_EXPORT_COLUMNS, FULL_EXPORT_COLUMNS};
pub use error::{ExportError, ExportResult};
