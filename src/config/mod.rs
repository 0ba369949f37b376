// ==========================================
// 库存增量同步 - 配置层
// ==========================================
// 职责: 流水线配置（桶 / 支持联系人 / 模式 / 存储后端）
// 来源: 环境变量 + 缺省值
// ==========================================

pub mod pipeline_config;

// 重导出核心配置
pub use pipeline_config::{config_keys, defaults, BaselineBackend, ConfigError, PipelineConfig};
