// ==========================================
// 集成测试辅助模块
// ==========================================

#![allow(dead_code)]

pub mod memory_store;
pub mod test_data_builder;

use inventory_sync::config::PipelineConfig;
use inventory_sync::domain::ProcessingMode;
use std::path::Path;

pub const INPUT_BUCKET: &str = "vendor-drop";

/// 测试用配置（存储根目录指向临时目录）
pub fn test_config(mode: ProcessingMode, root: &Path) -> PipelineConfig {
    PipelineConfig {
        mode,
        storage_root: root.to_path_buf(),
        sqlite_path: root.join("inventory-sync.db"),
        ..PipelineConfig::default()
    }
}
