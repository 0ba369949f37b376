// ==========================================
// 库存增量同步 - 运行指标
// ==========================================
// 职责: 批次指标 / 错误指标的构造与上报
// 说明: 指标上报失败只记日志，从不影响运行结果
// ==========================================

use serde::Serialize;
use std::time::Duration;
use tracing::info;

pub const METRIC_FILES_PROCESSED: &str = "FilesProcessed";
pub const METRIC_TOTAL_RECORDS: &str = "TotalRecordsProcessed";
pub const METRIC_DELTA_RECORDS: &str = "DeltaRecordsGenerated";
pub const METRIC_PROCESSING_TIME: &str = "ProcessingTime";
pub const METRIC_ERRORS: &str = "Errors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricUnit {
    Count,
    Milliseconds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDatum {
    pub name: &'static str,
    pub value: f64,
    pub unit: MetricUnit,
    pub dimensions: Vec<(String, String)>,
}

impl MetricDatum {
    fn count(name: &'static str, value: usize, function_name: &str) -> Self {
        Self {
            name,
            value: value as f64,
            unit: MetricUnit::Count,
            dimensions: vec![("FunctionName".to_string(), function_name.to_string())],
        }
    }
}

/// 构造批次指标
///
/// # 参数
/// - function_name: FunctionName 维度
/// - files: 成功处理的文件数
/// - total_records: 规范化记录总数
/// - delta_records: 导出的变更记录总数
/// - elapsed: 批次耗时
pub fn batch_metrics(
    function_name: &str,
    files: usize,
    total_records: usize,
    delta_records: usize,
    elapsed: Duration,
) -> Vec<MetricDatum> {
    vec![
        MetricDatum::count(METRIC_FILES_PROCESSED, files, function_name),
        MetricDatum::count(METRIC_TOTAL_RECORDS, total_records, function_name),
        MetricDatum::count(METRIC_DELTA_RECORDS, delta_records, function_name),
        MetricDatum {
            name: METRIC_PROCESSING_TIME,
            value: elapsed.as_millis() as f64,
            unit: MetricUnit::Milliseconds,
            dimensions: vec![("FunctionName".to_string(), function_name.to_string())],
        },
    ]
}

/// 构造错误指标（ErrorType 维度）
pub fn error_metrics(function_name: &str, error_type: &str) -> Vec<MetricDatum> {
    let mut datum = MetricDatum::count(METRIC_ERRORS, 1, function_name);
    datum
        .dimensions
        .push(("ErrorType".to_string(), error_type.to_string()));
    vec![datum]
}

// ==========================================
// MetricsSink Trait
// ==========================================
pub trait MetricsSink: Send + Sync {
    fn publish(&self, metrics: &[MetricDatum]);
}

// ==========================================
// TracingMetricsSink - 以结构化日志输出指标
// ==========================================
pub struct TracingMetricsSink {
    namespace: String,
}

impl TracingMetricsSink {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }
}

impl MetricsSink for TracingMetricsSink {
    fn publish(&self, metrics: &[MetricDatum]) {
        for datum in metrics {
            let dimensions = serde_json::to_string(&datum.dimensions).unwrap_or_default();
            info!(
                target: "inventory_sync::metrics",
                namespace = %self.namespace,
                metric = datum.name,
                value = datum.value,
                unit = ?datum.unit,
                dimensions = %dimensions,
                "metric"
            );
        }
    }
}
