// ==========================================
// 库存增量同步 - 数据清洗器实现
// ==========================================
// 职责: 单元格 → 标识符 / 数量 / 停产标记
// 红线: 单元格格式问题只降级（跳过或置 0），从不中断整行之外的处理
// ==========================================

use crate::domain::inventory::CellValue;

/// 停产标记的真值集合（小写 + trim 后比较）
const DISCONTINUED_TRUE_VALUES: [&str; 3] = ["yes", "1", "true"];

/// 数量解析失败的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityIssue {
    /// 无法解析为整数（含空白单元格），保留原始文本
    Unparseable(String),
    /// 解析结果为负数
    Negative(i64),
}

pub struct DataCleaner;

impl DataCleaner {
    /// 清洗标识符（强制转字符串 + TRIM）
    pub fn clean_identifier(&self, cell: Option<&CellValue>) -> String {
        cell.map(|c| c.as_text().trim().to_string())
            .unwrap_or_default()
    }

    /// 解析可用数量
    ///
    /// # 规则
    /// - 整数单元格: 原值
    /// - 有限浮点数单元格: 向零截断
    /// - 文本: trim 后取可选符号 + 前导数字串（"12 pcs" → 12，"1e3" → 1，"3.7" → 3）
    /// - 其余（含空单元格、布尔值、无前导数字的文本）: Unparseable
    /// - 负数: Negative
    pub fn parse_quantity(&self, cell: Option<&CellValue>) -> Result<u64, QuantityIssue> {
        let value = match cell {
            None | Some(CellValue::Empty) => {
                return Err(QuantityIssue::Unparseable(String::new()))
            }
            Some(CellValue::Int(i)) => *i,
            Some(CellValue::Float(f)) => truncate_float(*f)
                .ok_or_else(|| QuantityIssue::Unparseable(f.to_string()))?,
            Some(CellValue::Bool(b)) => return Err(QuantityIssue::Unparseable(b.to_string())),
            Some(CellValue::Text(s)) => {
                let trimmed = s.trim();
                leading_integer(trimmed)
                    .ok_or_else(|| QuantityIssue::Unparseable(trimmed.to_string()))?
            }
        };

        u64::try_from(value).map_err(|_| QuantityIssue::Negative(value))
    }

    /// 解析停产标记（"yes" / "1" / "true" 视为停产，大小写不敏感）
    pub fn parse_discontinued(&self, cell: Option<&CellValue>) -> bool {
        let value = cell
            .map(|c| c.as_text().trim().to_lowercase())
            .unwrap_or_default();
        DISCONTINUED_TRUE_VALUES.contains(&value.as_str())
    }
}

/// 读取文本开头的整数（可选 +/- 号后接至少一位数字），其后内容忽略
fn leading_integer(text: &str) -> Option<i64> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn truncate_float(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}
