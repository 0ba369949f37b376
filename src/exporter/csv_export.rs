// ==========================================
// 库存增量同步 - 批量导入 CSV 生成
// ==========================================
// 职责: InventoryRecord / DeltaRecord → 下游批量导入工具的 CSV
// 列集: 固定（标识符 / 数量 / 停产标记 / 库存跟踪方式 / 库存策略 [/ 变更类型 / 变更原因]）
// ==========================================

use crate::domain::inventory::{DeltaRecord, InventoryRecord};
use crate::exporter::error::{ExportError, ExportResult};
use csv::WriterBuilder;
use serde::Serialize;

pub const COL_BARCODE: &str = "Variant Barcode";
pub const COL_QUANTITY: &str = "Variant Inventory Qty";
pub const COL_DISCONTINUED: &str =
    "Variant Metafield: custom.internal_discontinued [single_line_text_field]";
pub const COL_TRACKER: &str = "Variant Inventory Tracker";
pub const COL_POLICY: &str = "Variant Inventory Policy";
pub const COL_CHANGE_TYPE: &str = "changeType";
pub const COL_CHANGE_REASON: &str = "changeReason";

pub const FULL_EXPORT_COLUMNS: [&str; 5] =
    [COL_BARCODE, COL_QUANTITY, COL_DISCONTINUED, COL_TRACKER, COL_POLICY];

pub const DELTA_EXPORT_COLUMNS: [&str; 7] = [
    COL_BARCODE,
    COL_QUANTITY,
    COL_DISCONTINUED,
    COL_TRACKER,
    COL_POLICY,
    COL_CHANGE_TYPE,
    COL_CHANGE_REASON,
];

/// 停产标记渲染为 "Yes" / "No"
pub fn render_discontinued(discontinued: bool) -> &'static str {
    if discontinued {
        "Yes"
    } else {
        "No"
    }
}

// 字段顺序必须与上面的列常量一致
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    barcode: &'a str,
    quantity: u64,
    discontinued: &'static str,
    tracker: &'a str,
    policy: &'a str,
}

#[derive(Debug, Serialize)]
struct DeltaExportRow<'a> {
    barcode: &'a str,
    quantity: u64,
    discontinued: &'static str,
    tracker: &'a str,
    policy: &'a str,
    change_type: &'static str,
    change_reason: &'a str,
}

// ==========================================
// CsvExporter
// ==========================================
#[derive(Debug, Clone)]
pub struct CsvExporter {
    inventory_tracker: String,
    inventory_policy: String,
}

impl CsvExporter {
    /// # 参数
    /// - inventory_tracker: 库存跟踪方式（常量列）
    /// - inventory_policy: 库存策略（常量列）
    pub fn new(inventory_tracker: impl Into<String>, inventory_policy: impl Into<String>) -> Self {
        Self {
            inventory_tracker: inventory_tracker.into(),
            inventory_policy: inventory_policy.into(),
        }
    }

    /// 全量导出
    pub fn render_full(&self, records: &[InventoryRecord]) -> ExportResult<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(FULL_EXPORT_COLUMNS)?;

        for record in records {
            writer.serialize(ExportRow {
                barcode: &record.identifier,
                quantity: record.quantity,
                discontinued: render_discontinued(record.discontinued),
                tracker: &self.inventory_tracker,
                policy: &self.inventory_policy,
            })?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Flush(e.to_string()))
    }

    /// 增量导出（变更集为空时只输出表头）
    pub fn render_delta(&self, records: &[DeltaRecord]) -> ExportResult<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(DELTA_EXPORT_COLUMNS)?;

        for delta in records {
            writer.serialize(DeltaExportRow {
                barcode: &delta.record.identifier,
                quantity: delta.record.quantity,
                discontinued: render_discontinued(delta.record.discontinued),
                tracker: &self.inventory_tracker,
                policy: &self.inventory_policy,
                change_type: delta.change_type.as_str(),
                change_reason: &delta.change_reason,
            })?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Flush(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ChangeType;

    fn exporter() -> CsvExporter {
        CsvExporter::new("shopify", "deny")
    }

    #[test]
    fn test_render_full() {
        let csv = exporter()
            .render_full(&[
                InventoryRecord::new("X1", 5, false),
                InventoryRecord::new("X2", 0, true),
            ])
            .unwrap();
        let text = String::from_utf8(csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Variant Barcode,Variant Inventory Qty,\
             Variant Metafield: custom.internal_discontinued [single_line_text_field],\
             Variant Inventory Tracker,Variant Inventory Policy"
        );
        assert_eq!(lines[1], "X1,5,No,shopify,deny");
        assert_eq!(lines[2], "X2,0,Yes,shopify,deny");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_render_delta_quotes_reasons_with_commas() {
        let csv = exporter()
            .render_delta(&[DeltaRecord {
                record: InventoryRecord::new("X1", 2, true),
                change_type: ChangeType::Updated,
                change_reason: "Quantity changed from 5 to 2, Discontinued status changed"
                    .to_string(),
            }])
            .unwrap();
        let text = String::from_utf8(csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].ends_with(",changeType,changeReason"));
        assert_eq!(
            lines[1],
            "X1,2,Yes,shopify,deny,updated,\"Quantity changed from 5 to 2, Discontinued status changed\""
        );
    }

    #[test]
    fn test_render_empty_delta_writes_header_only() {
        let csv = exporter().render_delta(&[]).unwrap();
        let text = String::from_utf8(csv).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Variant Barcode,"));
    }
}
