// ==========================================
// 库存增量同步 - 数据质量校验
// ==========================================
// 职责: 表头必需列校验（在处理任何数据行之前）+ 行级 DQ 警告定义
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{ColumnMap, REQUIRED_COLUMNS};
use serde::Serialize;

// ==========================================
// 行级 DQ 警告
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DqWarningKind {
    /// UPC 为空，整行跳过
    EmptyIdentifier,
    /// 数量无法解析，置 0
    UnparseableQuantity { upc: String, raw: String },
    /// 数量为负，置 0
    NegativeQuantity { upc: String, value: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DqWarning {
    pub row_number: usize,
    #[serde(flatten)]
    pub kind: DqWarningKind,
}

impl DqWarning {
    pub fn is_skip(&self) -> bool {
        matches!(self.kind, DqWarningKind::EmptyIdentifier)
    }
}

pub struct DqValidator;

impl DqValidator {
    /// 校验必需列是否全部存在
    ///
    /// 收集全部缺失列后一次性报错，而不是遇到第一个就返回
    pub fn validate_required_columns(&self, columns: &ColumnMap) -> ImportResult<()> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|spec| columns.resolve_spec(spec).is_none())
            .map(|spec| spec.canonical.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ImportError::MissingColumns(missing))
        }
    }
}
