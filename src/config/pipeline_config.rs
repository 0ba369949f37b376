// ==========================================
// 库存增量同步 - 流水线配置
// ==========================================
// 职责: 显式配置对象，构造时传入编排器（不使用进程级全局常量）
// 来源: 环境变量（见 config_keys），缺省值见 defaults
// ==========================================

use crate::domain::types::ProcessingMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const BUCKET: &str = "S3_BUCKET";
    pub const SUPPORT_EMAIL: &str = "SUPPORT_EMAIL";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    pub const MODE: &str = "INVENTORY_SYNC_MODE";
    pub const STORAGE_ROOT: &str = "INVENTORY_SYNC_STORAGE_ROOT";
    pub const BASELINE_BACKEND: &str = "INVENTORY_SYNC_BASELINE_BACKEND";
    pub const DB_PATH: &str = "INVENTORY_SYNC_DB_PATH";
    pub const REQUEST_ID: &str = "INVENTORY_SYNC_REQUEST_ID";
}

// ==========================================
// 缺省值
// ==========================================
pub mod defaults {
    pub const BUCKET: &str = "valleyridge-inventory-sync";
    pub const SUPPORT_EMAIL: &str = "support@valleyridge.ca";
    pub const LOG_LEVEL: &str = "info";
    pub const BASELINE_KEY: &str = "baseline/inventory-baseline.json";
    pub const OUTPUT_PREFIX: &str = "processed";
    pub const INVENTORY_TRACKER: &str = "shopify";
    pub const INVENTORY_POLICY: &str = "deny";
    pub const METRICS_NAMESPACE: &str = "ValleyRidge/InventorySync";
    pub const PROCESSED_BY: &str = "valleyridge-inventory-sync";
    pub const STORAGE_DIR: &str = "inventory-sync";
    pub const DB_FILE: &str = "inventory-sync.db";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

// ==========================================
// 基线存储后端
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineBackend {
    #[default]
    Object,
    Sqlite,
}

impl FromStr for BaselineBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "object" | "s3" => Ok(BaselineBackend::Object),
            "sqlite" => Ok(BaselineBackend::Sqlite),
            other => Err(format!("未知的基线存储后端: {}", other)),
        }
    }
}

// ==========================================
// PipelineConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 输出桶（导出文件 / latest / 基线都写入此桶）
    pub bucket: String,
    /// 故障通知收件人
    pub support_email: String,
    pub log_level: String,
    pub mode: ProcessingMode,
    /// 基线槽位键（所有运行共用）
    pub baseline_key: String,
    /// 导出文件前缀
    pub output_prefix: String,
    pub inventory_tracker: String,
    pub inventory_policy: String,
    pub metrics_namespace: String,
    /// 写入对象元数据 processed-by，同时作为指标的 FunctionName 维度
    pub processed_by: String,
    /// 本地对象存储根目录
    pub storage_root: PathBuf,
    pub baseline_backend: BaselineBackend,
    pub sqlite_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let storage_root = default_storage_root();
        Self {
            bucket: defaults::BUCKET.to_string(),
            support_email: defaults::SUPPORT_EMAIL.to_string(),
            log_level: defaults::LOG_LEVEL.to_string(),
            mode: ProcessingMode::default(),
            baseline_key: defaults::BASELINE_KEY.to_string(),
            output_prefix: defaults::OUTPUT_PREFIX.to_string(),
            inventory_tracker: defaults::INVENTORY_TRACKER.to_string(),
            inventory_policy: defaults::INVENTORY_POLICY.to_string(),
            metrics_namespace: defaults::METRICS_NAMESPACE.to_string(),
            processed_by: defaults::PROCESSED_BY.to_string(),
            sqlite_path: storage_root.join(defaults::DB_FILE),
            storage_root,
            baseline_backend: BaselineBackend::default(),
        }
    }
}

impl PipelineConfig {
    /// 从环境变量读取配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置（空白值视为未设置）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(v) = get(config_keys::BUCKET) {
            config.bucket = v;
        }
        if let Some(v) = get(config_keys::SUPPORT_EMAIL) {
            config.support_email = v;
        }
        if let Some(v) = get(config_keys::LOG_LEVEL) {
            config.log_level = v.to_lowercase();
        }
        if let Some(v) = get(config_keys::MODE) {
            config.mode = parse_value(config_keys::MODE, &v)?;
        }
        if let Some(v) = get(config_keys::STORAGE_ROOT) {
            config.storage_root = PathBuf::from(v);
            config.sqlite_path = config.storage_root.join(defaults::DB_FILE);
        }
        if let Some(v) = get(config_keys::BASELINE_BACKEND) {
            config.baseline_backend = parse_value(config_keys::BASELINE_BACKEND, &v)?;
        }
        if let Some(v) = get(config_keys::DB_PATH) {
            config.sqlite_path = PathBuf::from(v);
        }

        Ok(config)
    }

    /// latest 指针文件键
    pub fn latest_key(&self) -> String {
        match self.mode {
            ProcessingMode::Full => format!("{}/latest/inventory.csv", self.output_prefix),
            ProcessingMode::Incremental => {
                format!("{}/latest/inventory-delta.csv", self.output_prefix)
            }
        }
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr<Err = String>,
{
    value.parse::<T>().map_err(|message| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message,
    })
}

/// 默认存储根目录：用户数据目录下的 inventory-sync/
fn default_storage_root() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(defaults::STORAGE_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(defaults::STORAGE_DIR))
}
