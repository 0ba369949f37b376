// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use inventory_sync::domain::InventoryRecord;
use rust_xlsxwriter::Workbook;

pub const HEADER: [&str; 3] = ["UPC", "Available Qty", "Discontinued"];

pub fn record(identifier: &str, quantity: u64, discontinued: bool) -> InventoryRecord {
    InventoryRecord::new(identifier, quantity, discontinued)
}

/// 由字符串行构建 CSV 内容
pub fn csv_bytes(rows: &[&[&str]]) -> Vec<u8> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(*row).unwrap();
    }
    writer.into_inner().unwrap()
}

/// 标准三列库存表（CSV）
pub fn inventory_csv(rows: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut all: Vec<Vec<&str>> = vec![HEADER.to_vec()];
    all.extend(rows.iter().map(|(upc, qty, disc)| vec![*upc, *qty, *disc]));
    let refs: Vec<&[&str]> = all.iter().map(|r| r.as_slice()).collect();
    csv_bytes(&refs)
}

// ==========================================
// Excel 夹具
// ==========================================

pub enum XCell {
    Text(&'static str),
    Number(f64),
    Blank,
}

/// 生成单工作表 .xlsx 内容（Blank 单元格不写入）
pub fn xlsx_bytes(rows: &[Vec<XCell>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                XCell::Text(text) => {
                    worksheet.write_string(r as u32, c as u16, *text).unwrap();
                }
                XCell::Number(value) => {
                    worksheet.write_number(r as u32, c as u16, *value).unwrap();
                }
                XCell::Blank => {}
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// 表头中夹有空白单元格的库存表（供应商实际导出格式）
pub fn blank_header_workbook() -> Vec<u8> {
    use XCell::*;
    xlsx_bytes(&[
        vec![
            Text("Item ID"),
            Text("In Stock"),
            Text("Available Qty"),
            Blank,
            Text("UPC"),
            Text("Discontinued"),
            Text("ETA"),
        ],
        vec![
            Text("A"),
            Text("N"),
            Number(0.0),
            Blank,
            Text("X00000014816"),
            Text("N"),
            Text("2026-01-27"),
        ],
        vec![
            Text("B"),
            Text("Y"),
            Number(14.0),
            Blank,
            Text("X00000014817"),
            Text("Yes"),
            Text("2026-02-03"),
        ],
    ])
}
