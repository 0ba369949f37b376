// ==========================================
// 库存增量同步 - 应用状态
// ==========================================
// 职责: 按配置组装对象存储 / 基线仓储 / 编排器 / 事件处理器
// ==========================================

use std::sync::Arc;

use crate::app::handler::EventHandler;
use crate::config::{BaselineBackend, PipelineConfig};
use crate::engine::orchestrator::InventoryPipeline;
use crate::metrics::{MetricsSink, TracingMetricsSink};
use crate::notifier::{ErrorNotifier, LogNotifier};
use crate::repository::{
    BaselineRepository, LocalObjectStore, ObjectBaselineRepository, ObjectStore,
    SqliteBaselineRepository, StorageError, StorageResult,
};

/// 应用状态
///
/// 持有共享的存储实例与事件处理器
pub struct AppState {
    pub config: PipelineConfig,

    /// 对象存储（输入 / 导出 / latest / 对象基线）
    pub store: Arc<dyn ObjectStore>,

    /// 基线仓储
    pub baseline: Arc<dyn BaselineRepository>,

    /// 事件处理器
    pub handler: EventHandler,
}

impl AppState {
    /// 按配置创建应用状态（本地文件系统对象存储）
    ///
    /// # 错误
    /// - 存储根目录无法创建
    /// - SQLite 基线数据库无法打开
    pub fn from_config(config: PipelineConfig) -> StorageResult<Self> {
        tracing::info!(
            storage_root = %config.storage_root.display(),
            backend = ?config.baseline_backend,
            "初始化 AppState"
        );

        std::fs::create_dir_all(&config.storage_root)?;
        let store: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(&config.storage_root));
        Self::with_store(config, store)
    }

    /// 使用外部提供的对象存储创建应用状态
    pub fn with_store(config: PipelineConfig, store: Arc<dyn ObjectStore>) -> StorageResult<Self> {
        let baseline = build_baseline_repository(&config, store.clone())?;
        let metrics = Arc::new(TracingMetricsSink::new(config.metrics_namespace.clone()));
        Ok(Self::with_components(
            config,
            store,
            baseline,
            metrics,
            Arc::new(LogNotifier),
        ))
    }

    /// 使用全部外部组件创建应用状态
    pub fn with_components(
        config: PipelineConfig,
        store: Arc<dyn ObjectStore>,
        baseline: Arc<dyn BaselineRepository>,
        metrics: Arc<dyn MetricsSink>,
        notifier: Arc<dyn ErrorNotifier>,
    ) -> Self {
        let pipeline = InventoryPipeline::new(config.clone(), store.clone(), baseline.clone());
        Self {
            handler: EventHandler::new(pipeline, metrics, notifier),
            config,
            store,
            baseline,
        }
    }
}

/// 按配置选择基线存储后端
pub fn build_baseline_repository(
    config: &PipelineConfig,
    store: Arc<dyn ObjectStore>,
) -> StorageResult<Arc<dyn BaselineRepository>> {
    match config.baseline_backend {
        BaselineBackend::Object => Ok(Arc::new(ObjectBaselineRepository::new(
            store,
            config.bucket.clone(),
            config.baseline_key.clone(),
            config.processed_by.clone(),
            config.inventory_tracker.clone(),
            config.inventory_policy.clone(),
        ))),
        BaselineBackend::Sqlite => {
            if let Some(parent) = config.sqlite_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let db_path = config.sqlite_path.to_str().ok_or_else(|| {
                StorageError::Io(format!(
                    "数据库路径不是合法 UTF-8: {}",
                    config.sqlite_path.display()
                ))
            })?;
            Ok(Arc::new(SqliteBaselineRepository::new(
                db_path,
                config.baseline_key.clone(),
                config.inventory_tracker.clone(),
                config.inventory_policy.clone(),
            )?))
        }
    }
}
