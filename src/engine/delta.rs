// ==========================================
// 库存增量同步 - 增量对比引擎
// ==========================================
// 职责: 当前库存表 vs 基线 → 变更记录 (new / updated / deleted)
// 输入: current / baseline 两张规范化表
// 输出: Vec<DeltaRecord>，固定三段顺序: new → updated → deleted
// 红线: 未变化的记录不输出；deleted 的数量强制为 0
// ==========================================

use crate::domain::inventory::{DeltaRecord, InventoryRecord};
use crate::domain::types::ChangeType;
use std::collections::HashMap;

pub const REASON_NEW: &str = "New product";
pub const REASON_DELETED: &str = "Product removed from inventory";
pub const REASON_DISCONTINUED_CHANGED: &str = "Discontinued status changed";

// ==========================================
// RecordIndex - 标识符 → 记录（保持首次出现顺序）
// ==========================================
// 同一标识符重复出现时，后出现的记录覆盖先出现的，但位置保持不变
struct RecordIndex<'a> {
    order: Vec<&'a str>,
    by_id: HashMap<&'a str, &'a InventoryRecord>,
}

impl<'a> RecordIndex<'a> {
    fn build(records: &'a [InventoryRecord]) -> Self {
        let mut order = Vec::with_capacity(records.len());
        let mut by_id = HashMap::with_capacity(records.len());
        for record in records {
            let id = record.identifier.as_str();
            if by_id.insert(id, record).is_none() {
                order.push(id);
            }
        }
        Self { order, by_id }
    }

    fn get(&self, id: &str) -> Option<&'a InventoryRecord> {
        self.by_id.get(id).copied()
    }

    fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    fn iter(&self) -> impl Iterator<Item = &'a InventoryRecord> + '_ {
        self.order.iter().filter_map(move |id| self.by_id.get(id).copied())
    }
}

// ==========================================
// DeltaEngine - 增量对比引擎
// ==========================================
// 红线: 无状态引擎,所有方法都是纯函数
#[derive(Debug, Default)]
pub struct DeltaEngine;

impl DeltaEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算变更集
    ///
    /// # 参数
    /// - current: 本次规范化结果
    /// - baseline: 上次保存的基线（冷启动时为空）
    ///
    /// # 返回
    /// 变更记录，new 段与 updated 段按 current 顺序，deleted 段按 baseline 顺序
    pub fn compute(
        &self,
        current: &[InventoryRecord],
        baseline: &[InventoryRecord],
    ) -> Vec<DeltaRecord> {
        let current_index = RecordIndex::build(current);
        let baseline_index = RecordIndex::build(baseline);
        let mut delta = Vec::new();

        // 1. new: current 有，baseline 无
        for record in current_index.iter() {
            if !baseline_index.contains(&record.identifier) {
                delta.push(DeltaRecord {
                    record: record.clone(),
                    change_type: ChangeType::New,
                    change_reason: REASON_NEW.to_string(),
                });
            }
        }

        // 2. updated: 两边都有且字段变化
        for record in current_index.iter() {
            if let Some(previous) = baseline_index.get(&record.identifier) {
                if record.differs_from(previous) {
                    delta.push(DeltaRecord {
                        record: record.clone(),
                        change_type: ChangeType::Updated,
                        change_reason: change_reason(previous, record),
                    });
                }
            }
        }

        // 3. deleted: baseline 有，current 无
        for record in baseline_index.iter() {
            if !current_index.contains(&record.identifier) {
                delta.push(DeltaRecord {
                    record: InventoryRecord {
                        quantity: 0,
                        ..record.clone()
                    },
                    change_type: ChangeType::Deleted,
                    change_reason: REASON_DELETED.to_string(),
                });
            }
        }

        delta
    }
}

/// 变更原因：数量变化在前，停产状态变化在后，逗号分隔
fn change_reason(previous: &InventoryRecord, current: &InventoryRecord) -> String {
    let mut reasons = Vec::new();
    if previous.quantity != current.quantity {
        reasons.push(format!(
            "Quantity changed from {} to {}",
            previous.quantity, current.quantity
        ));
    }
    if previous.discontinued != current.discontinued {
        reasons.push(REASON_DISCONTINUED_CHANGED.to_string());
    }
    reasons.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, quantity: u64, discontinued: bool) -> InventoryRecord {
        InventoryRecord::new(id, quantity, discontinued)
    }

    #[test]
    fn test_against_itself_yields_nothing() {
        let table = vec![rec("A", 5, false), rec("B", 0, true), rec("C", 9, false)];
        assert!(DeltaEngine::new().compute(&table, &table).is_empty());
    }

    #[test]
    fn test_new_record_on_cold_start() {
        let delta = DeltaEngine::new().compute(&[rec("A", 5, false)], &[]);

        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].change_type, ChangeType::New);
        assert_eq!(delta[0].change_reason, "New product");
        assert_eq!(delta[0].record, rec("A", 5, false));
    }

    #[test]
    fn test_quantity_update() {
        let delta = DeltaEngine::new().compute(&[rec("A", 7, false)], &[rec("A", 5, false)]);

        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].change_type, ChangeType::Updated);
        assert_eq!(delta[0].change_reason, "Quantity changed from 5 to 7");
        assert_eq!(delta[0].record.quantity, 7);
    }

    #[test]
    fn test_update_reason_lists_both_changes_in_order() {
        let delta = DeltaEngine::new().compute(&[rec("A", 2, true)], &[rec("A", 5, false)]);

        assert_eq!(
            delta[0].change_reason,
            "Quantity changed from 5 to 2, Discontinued status changed"
        );
        assert!(delta[0].record.discontinued);
    }

    #[test]
    fn test_discontinued_only_update() {
        let delta = DeltaEngine::new().compute(&[rec("A", 5, true)], &[rec("A", 5, false)]);
        assert_eq!(delta[0].change_reason, "Discontinued status changed");
    }

    #[test]
    fn test_deleted_record_forces_zero_quantity() {
        let delta = DeltaEngine::new().compute(&[], &[rec("A", 5, true)]);

        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].change_type, ChangeType::Deleted);
        assert_eq!(delta[0].record, rec("A", 0, true));
        assert_eq!(delta[0].change_reason, "Product removed from inventory");
    }

    #[test]
    fn test_phase_order_is_new_updated_deleted() {
        let baseline = vec![rec("gone-1", 1, false), rec("kept", 1, false), rec("gone-2", 3, false)];
        let current = vec![rec("kept", 2, false), rec("fresh-1", 4, false), rec("fresh-2", 5, false)];

        let delta = DeltaEngine::new().compute(&current, &baseline);
        let summary: Vec<(ChangeType, &str)> = delta
            .iter()
            .map(|d| (d.change_type, d.identifier()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (ChangeType::New, "fresh-1"),
                (ChangeType::New, "fresh-2"),
                (ChangeType::Updated, "kept"),
                (ChangeType::Deleted, "gone-1"),
                (ChangeType::Deleted, "gone-2"),
            ]
        );
    }

    #[test]
    fn test_duplicate_identifier_later_row_wins_first_position_kept() {
        let current = vec![rec("A", 1, false), rec("B", 2, false), rec("A", 9, false)];
        let delta = DeltaEngine::new().compute(&current, &[]);

        assert_eq!(delta.len(), 2);
        assert_eq!(delta[0].record, rec("A", 9, false));
        assert_eq!(delta[1].record, rec("B", 2, false));
    }
}
