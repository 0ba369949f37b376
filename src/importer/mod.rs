// ==========================================
// 库存增量同步 - 导入层
// ==========================================
// 职责: 外部表格 → 规范化库存表
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod inventory_importer;

// 重导出核心类型
pub use data_cleaner::{DataCleaner, QuantityIssue};
pub use dq_validator::{DqValidator, DqWarning, DqWarningKind};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{ColumnMap, ColumnSpec, FieldMapper, REQUIRED_COLUMNS};
pub use file_parser::{
    detect_file_kind, CsvParser, ExcelParser, InputFileKind, SheetParser, UniversalFileParser,
};
pub use inventory_importer::{InventoryImporter, NormalizedTable};
