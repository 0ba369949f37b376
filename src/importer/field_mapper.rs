// ==========================================
// 库存增量同步 - 字段映射器实现
// ==========================================
// 职责: 表头 → 列号映射 (ColumnMap) + 数据行 → InventoryRecord
// 红线: 列号永远是表头在原始行中的位置；空白表头不登记，但不挤占后续列号
// ==========================================

use crate::domain::inventory::{CellValue, InventoryRecord};
use crate::importer::data_cleaner::{DataCleaner, QuantityIssue};
use crate::importer::dq_validator::{DqWarning, DqWarningKind};
use tracing::warn;

// ==========================================
// 必需列定义
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// 报错 / 展示时使用的列名
    pub canonical: &'static str,
    /// 可接受的列名（按顺序尝试）
    pub aliases: &'static [&'static str],
}

pub const UPC_COLUMN: ColumnSpec = ColumnSpec {
    canonical: "UPC",
    aliases: &["UPC"],
};

pub const QUANTITY_COLUMN: ColumnSpec = ColumnSpec {
    canonical: "Available Qty",
    aliases: &["Available Qty", "AvailableQty"],
};

pub const DISCONTINUED_COLUMN: ColumnSpec = ColumnSpec {
    canonical: "Discontinued",
    aliases: &["Discontinued"],
};

pub const REQUIRED_COLUMNS: [ColumnSpec; 3] = [UPC_COLUMN, QUANTITY_COLUMN, DISCONTINUED_COLUMN];

/// 列名比较键：小写 + 连续空白折叠为单个空格
pub fn fold_header_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ==========================================
// ColumnMap - 表头映射
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnEntry {
    /// trim 后的列名
    name: String,
    /// 比较键（fold_header_name），构建时计算一次
    key: String,
    /// 原始列号
    index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    // 按首次出现顺序
    entries: Vec<ColumnEntry>,
}

impl ColumnMap {
    /// 从原始表头行构建映射
    ///
    /// 同名（trim 后完全相同）列重复出现时，后出现的覆盖先出现的列号
    pub fn from_header_row(header: &[CellValue]) -> Self {
        let mut entries: Vec<ColumnEntry> = Vec::new();

        for (index, cell) in header.iter().enumerate() {
            let text = cell.as_text();
            let name = text.trim();
            if name.is_empty() {
                continue;
            }

            match entries.iter_mut().find(|entry| entry.name == name) {
                Some(entry) => entry.index = index,
                None => entries.push(ColumnEntry {
                    name: name.to_string(),
                    key: fold_header_name(name),
                    index,
                }),
            }
        }

        Self { entries }
    }

    /// 大小写不敏感地解析列号
    ///
    /// 多个列名仅大小写/空白不同时，取原始位置最靠后的一列
    pub fn resolve(&self, name: &str) -> Option<usize> {
        let wanted = fold_header_name(name);
        self.entries
            .iter()
            .filter(|entry| entry.key == wanted)
            .map(|entry| entry.index)
            .max()
    }

    /// 按列定义解析（依次尝试所有别名）
    pub fn resolve_spec(&self, spec: &ColumnSpec) -> Option<usize> {
        spec.aliases.iter().find_map(|alias| self.resolve(alias))
    }

    /// 取数据行中指定列的单元格；列不存在或行长度不足时返回 None
    pub fn cell<'a>(&self, row: &'a [CellValue], spec: &ColumnSpec) -> Option<&'a CellValue> {
        self.resolve_spec(spec).and_then(|index| row.get(index))
    }

    /// 已登记的列名（按首次出现顺序）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// FieldMapper - 数据行规范化
// ==========================================
pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 将一行原始数据映射为 InventoryRecord
    ///
    /// # 参数
    /// - row: 原始数据行
    /// - columns: 表头映射
    /// - row_number: 1-based 行号（用于诊断）
    /// - warnings: 行级警告收集器
    ///
    /// # 返回
    /// - Some(record): 映射成功（数量可能已被置 0）
    /// - None: UPC 为空，跳过该行（不是错误）
    pub fn map_row(
        &self,
        row: &[CellValue],
        columns: &ColumnMap,
        row_number: usize,
        warnings: &mut Vec<DqWarning>,
    ) -> Option<InventoryRecord> {
        let identifier = self
            .cleaner
            .clean_identifier(columns.cell(row, &UPC_COLUMN));
        if identifier.is_empty() {
            warn!(row_number, "UPC 为空，跳过该行");
            warnings.push(DqWarning {
                row_number,
                kind: DqWarningKind::EmptyIdentifier,
            });
            return None;
        }

        let quantity = match self
            .cleaner
            .parse_quantity(columns.cell(row, &QUANTITY_COLUMN))
        {
            Ok(quantity) => quantity,
            Err(QuantityIssue::Unparseable(raw)) => {
                warn!(row_number, upc = %identifier, raw = %raw, "数量无法解析，置为 0");
                warnings.push(DqWarning {
                    row_number,
                    kind: DqWarningKind::UnparseableQuantity {
                        upc: identifier.clone(),
                        raw,
                    },
                });
                0
            }
            Err(QuantityIssue::Negative(value)) => {
                warn!(row_number, upc = %identifier, value, "数量为负，置为 0");
                warnings.push(DqWarning {
                    row_number,
                    kind: DqWarningKind::NegativeQuantity {
                        upc: identifier.clone(),
                        value,
                    },
                });
                0
            }
        };

        let discontinued = self
            .cleaner
            .parse_discontinued(columns.cell(row, &DISCONTINUED_COLUMN));

        Some(InventoryRecord {
            identifier,
            quantity,
            discontinued,
        })
    }
}
