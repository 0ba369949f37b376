// ==========================================
// 库存增量同步 - 领域类型定义
// ==========================================
// 职责: 变更类型 / 处理模式等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 变更类型 (Change Type)
// ==========================================
// 序列化格式: lowercase（与下游导入文件的 changeType 列一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    New,     // 基线中不存在
    Updated, // 数量或停产状态变化
    Deleted, // 本次导出中消失
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::New => "new",
            ChangeType::Updated => "updated",
            ChangeType::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 处理模式 (Processing Mode)
// ==========================================
// Full: 导出全量规范化记录
// Incremental: 仅导出相对基线的变更
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    Full,
    #[default]
    Incremental,
}

impl ProcessingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Full => "full",
            ProcessingMode::Incremental => "incremental",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProcessingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(ProcessingMode::Full),
            "incremental" | "delta" => Ok(ProcessingMode::Incremental),
            other => Err(format!("未知的处理模式: {}", other)),
        }
    }
}
