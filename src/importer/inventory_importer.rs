// ==========================================
// 库存增量同步 - 库存表导入器
// ==========================================
// 职责: RawSheet → 规范化库存表
// 流程: 行数检查 → 表头映射 → 必需列校验 → 逐行映射（按行序收集）
// ==========================================

use crate::domain::inventory::{InventoryRecord, RawSheet};
use crate::importer::dq_validator::{DqValidator, DqWarning};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{ColumnMap, FieldMapper};
use crate::importer::file_parser::UniversalFileParser;
use tracing::{debug, info};

// ==========================================
// NormalizedTable - 规范化结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct NormalizedTable {
    /// 有效记录（按原始行序）
    pub records: Vec<InventoryRecord>,
    /// 行级警告
    pub warnings: Vec<DqWarning>,
    /// 数据行总数（不含表头、不含零单元格行）
    pub data_rows: usize,
}

impl NormalizedTable {
    /// 因 UPC 为空而被跳过的行数
    pub fn skipped_rows(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_skip()).count()
    }
}

// ==========================================
// InventoryImporter
// ==========================================
pub struct InventoryImporter {
    parser: UniversalFileParser,
    validator: DqValidator,
    mapper: FieldMapper,
}

impl Default for InventoryImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            validator: DqValidator,
            mapper: FieldMapper::new(),
        }
    }

    /// 解析文件内容并规范化
    ///
    /// # 参数
    /// - file_name: 对象键或文件名（用于判断格式）
    /// - bytes: 文件内容
    pub fn import_bytes(&self, file_name: &str, bytes: &[u8]) -> ImportResult<NormalizedTable> {
        let sheet = self.parser.parse(file_name, bytes)?;
        if let Some(name) = &sheet.sheet_name {
            info!(sheet = %name, "读取工作表");
        }
        self.normalize_sheet(&sheet)
    }

    /// 规范化整张表
    ///
    /// # 错误
    /// - InvalidInputFormat: 表格无任何行
    /// - EmptyInput: 只有表头没有数据行
    /// - MissingColumns: 缺少必需列（在处理任何数据行之前报出）
    pub fn normalize_sheet(&self, sheet: &RawSheet) -> ImportResult<NormalizedTable> {
        if sheet.is_empty() {
            return Err(ImportError::InvalidInputFormat("表格没有任何行".to_string()));
        }
        if sheet.len() < 2 {
            return Err(ImportError::EmptyInput { rows: sheet.len() });
        }

        let header = sheet.header().unwrap_or_default();
        let columns = ColumnMap::from_header_row(header);
        debug!(headers = ?columns.names().collect::<Vec<_>>(), "表头映射完成");

        self.validator.validate_required_columns(&columns)?;
        info!(data_rows = sheet.len() - 1, "必需列校验通过");

        let mut table = NormalizedTable::default();
        for (row_number, row) in sheet.data_rows() {
            if row.is_empty() {
                continue;
            }
            table.data_rows += 1;
            if let Some(record) =
                self.mapper
                    .map_row(row, &columns, row_number, &mut table.warnings)
            {
                table.records.push(record);
            }
        }

        info!(
            valid = table.records.len(),
            skipped = table.skipped_rows(),
            warnings = table.warnings.len(),
            "数据行规范化完成"
        );

        Ok(table)
    }
}
