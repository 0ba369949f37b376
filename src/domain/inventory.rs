// ==========================================
// 库存增量同步 - 库存领域实体
// ==========================================
// 职责: 原始表格 (RawSheet) / 规范化库存记录 / 变更记录
// 红线: 记录在规范化后不可变，标识符是跨快照比较的唯一键
// ==========================================

use crate::domain::types::ChangeType;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellValue - 未定型单元格
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    /// 单元格是否没有任何内容（空白字符串不算空）
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 强制转换为字符串（数值按最短十进制表示，整数值浮点数不带小数点）
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

// ==========================================
// RawSheet - 原始表格
// ==========================================
// 第一行为表头，其余为数据行；允许参差行（行长度与表头不一致）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub sheet_name: Option<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    /// 从行列表构建，每行尾部的 Empty 单元格会被截掉
    ///
    /// 全空行因此成为零单元格行，在规范化时被丢弃
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let rows = rows.into_iter().map(trim_trailing_empty).collect();
        Self {
            sheet_name: None,
            rows,
        }
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// 总行数（含表头）
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn header(&self) -> Option<&[CellValue]> {
        self.rows.first().map(|r| r.as_slice())
    }

    /// 数据行迭代器，附带 1-based 行号（表头为第 1 行）
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[CellValue])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, row)| (idx + 1, row.as_slice()))
    }
}

fn trim_trailing_empty(mut row: Vec<CellValue>) -> Vec<CellValue> {
    while matches!(row.last(), Some(cell) if cell.is_empty()) {
        row.pop();
    }
    row
}

// ==========================================
// InventoryRecord - 规范化库存记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InventoryRecord {
    /// 商品 UPC（已 trim，非空）
    pub identifier: String,
    /// 可用数量（非负）
    pub quantity: u64,
    /// 是否停产
    pub discontinued: bool,
}

impl InventoryRecord {
    pub fn new(identifier: impl Into<String>, quantity: u64, discontinued: bool) -> Self {
        Self {
            identifier: identifier.into(),
            quantity,
            discontinued,
        }
    }

    /// 与另一条记录（同一标识符）相比字段是否有变化
    pub fn differs_from(&self, other: &InventoryRecord) -> bool {
        self.quantity != other.quantity || self.discontinued != other.discontinued
    }
}

// ==========================================
// DeltaRecord - 变更记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaRecord {
    pub record: InventoryRecord,
    pub change_type: ChangeType,
    pub change_reason: String,
}

impl DeltaRecord {
    pub fn identifier(&self) -> &str {
        &self.record.identifier
    }
}

// ==========================================
// DeltaSummary - 变更汇总
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaSummary {
    pub new: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl DeltaSummary {
    pub fn from_records(records: &[DeltaRecord]) -> Self {
        records
            .iter()
            .fold(DeltaSummary::default(), |mut acc, r| {
                match r.change_type {
                    ChangeType::New => acc.new += 1,
                    ChangeType::Updated => acc.updated += 1,
                    ChangeType::Deleted => acc.deleted += 1,
                }
                acc
            })
    }

    pub fn total(&self) -> usize {
        self.new + self.updated + self.deleted
    }
}
