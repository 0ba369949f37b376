// ==========================================
// 库存增量同步 - 文件解析器实现
// ==========================================
// 职责: 字节流 → RawSheet（只读取第一个工作表）
// 支持: Excel (.xlsx/.xls) / CSV (.csv) / 无扩展名（按工作簿内容识别）
// ==========================================

use crate::domain::inventory::{CellValue, RawSheet};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;

// ==========================================
// SheetParser Trait
// ==========================================
pub trait SheetParser: Send + Sync {
    /// 将文件内容解析为原始表格
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawSheet>;
}

// ==========================================
// 文件类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFileKind {
    Workbook,
    Csv,
}

/// 根据对象键判断文件类型
///
/// 无扩展名的文件按工作簿处理，交给 calamine 做内容识别
pub fn detect_file_kind(file_name: &str) -> ImportResult<InputFileKind> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        None | Some("") => Ok(InputFileKind::Workbook),
        Some("xlsx") | Some("xls") => Ok(InputFileKind::Workbook),
        Some("csv") => Ok(InputFileKind::Csv),
        Some(other) => Err(ImportError::UnsupportedFileType(format!(
            "{} (.{})",
            file_name, other
        ))),
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl SheetParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawSheet> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::InvalidInputFormat("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // range 从首个非空单元格开始，补齐左侧空列以保持原始列位置
        let leading_cols = range.start().map(|(_, col)| col as usize).unwrap_or(0);

        let rows = range
            .rows()
            .map(|row| {
                std::iter::repeat(CellValue::Empty)
                    .take(leading_cols)
                    .chain(row.iter().map(convert_cell))
                    .collect()
            })
            .collect();

        Ok(RawSheet::from_rows(rows).with_sheet_name(sheet_name))
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        // 日期 / 错误值等按显示文本处理
        other => CellValue::Text(other.to_string()),
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl SheetParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawSheet> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row = record
                .iter()
                .map(|value| {
                    if value.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(value.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }

        Ok(RawSheet::from_rows(rows))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse(&self, file_name: &str, bytes: &[u8]) -> ImportResult<RawSheet> {
        match detect_file_kind(file_name)? {
            InputFileKind::Workbook => ExcelParser.parse_bytes(bytes),
            InputFileKind::Csv => CsvParser.parse_bytes(bytes),
        }
    }
}
