// ==========================================
// 库存增量同步 - 事件处理器
// ==========================================
// 职责: 逐个处理事件中的文件，汇总结果，上报指标与故障
// 策略: 顺序处理；单文件失败不影响其余文件；
//       全部失败时返回 BatchFailed，交由宿主重试
// ==========================================

use crate::app::event::StorageEvent;
use crate::engine::error::{PipelineError, PipelineResult};
use crate::engine::orchestrator::{FileReport, InventoryPipeline};
use crate::metrics::{batch_metrics, error_metrics, MetricsSink};
use crate::notifier::{ErrorNotifier, FailureNotice};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

// ==========================================
// FileResult - 单文件结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileResult {
    Success(FileReport),
    Failed {
        #[serde(rename = "inputFile")]
        input_file: String,
        #[serde(rename = "errorType")]
        error_type: String,
        error: String,
    },
}

impl FileResult {
    pub fn report(&self) -> Option<&FileReport> {
        match self {
            FileResult::Success(report) => Some(report),
            FileResult::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FileResult::Failed { .. })
    }
}

// ==========================================
// BatchReport - 批次结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub message: String,
    pub request_id: String,
    pub results: Vec<FileResult>,
    #[serde(rename = "processingTime")]
    pub processing_time_ms: u64,
}

impl BatchReport {
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }
}

// ==========================================
// EventHandler
// ==========================================
pub struct EventHandler {
    pipeline: InventoryPipeline,
    metrics: Arc<dyn MetricsSink>,
    notifier: Arc<dyn ErrorNotifier>,
}

impl EventHandler {
    pub fn new(
        pipeline: InventoryPipeline,
        metrics: Arc<dyn MetricsSink>,
        notifier: Arc<dyn ErrorNotifier>,
    ) -> Self {
        Self {
            pipeline,
            metrics,
            notifier,
        }
    }

    pub fn pipeline(&self) -> &InventoryPipeline {
        &self.pipeline
    }

    /// 处理一个存储事件
    ///
    /// # 参数
    /// - event: 存储通知事件
    /// - request_id: 关联 ID
    ///
    /// # 返回
    /// - Ok(BatchReport): 至少一个文件成功，或事件不含文件
    /// - Err(InvalidEvent): 事件中的对象键无法解码
    /// - Err(BatchFailed): 事件含文件且全部失败
    pub async fn handle(
        &self,
        event: &StorageEvent,
        request_id: &str,
    ) -> PipelineResult<BatchReport> {
        let started = Instant::now();
        let mode = self.pipeline.config().mode;
        info!(request_id, files = event.records.len(), mode = %mode, "开始处理存储事件");

        let objects = match event.objects() {
            Ok(objects) => objects,
            Err(e) => {
                self.report_failure(request_id, None, &e).await;
                return Err(e);
            }
        };

        let mut results = Vec::with_capacity(objects.len());
        for object in &objects {
            match self
                .pipeline
                .process_object(&object.bucket, &object.key, request_id)
                .await
            {
                Ok(report) => results.push(FileResult::Success(report)),
                Err(e) => {
                    error!(request_id, file = %object.key, error = %e, "文件处理失败");
                    self.report_failure(request_id, Some(&object.key), &e).await;
                    results.push(FileResult::Failed {
                        input_file: object.key.clone(),
                        error_type: e.kind().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let elapsed = started.elapsed();
        let reports: Vec<&FileReport> = results.iter().filter_map(FileResult::report).collect();
        let failed = results.len() - reports.len();

        if !results.is_empty() && reports.is_empty() {
            let first_error = results
                .iter()
                .find_map(|r| match r {
                    FileResult::Failed { error, .. } => Some(error.clone()),
                    FileResult::Success(_) => None,
                })
                .unwrap_or_default();
            // 每个失败文件已各自上报 Errors，这里不再重复计数
            error!(request_id, failed, "批次内所有文件处理失败");
            return Err(PipelineError::BatchFailed {
                failed,
                first_error,
            });
        }

        let total_records: usize = reports.iter().map(|r| r.total_records).sum();
        let delta_records: usize = reports.iter().map(|r| r.delta_records).sum();
        self.metrics.publish(&batch_metrics(
            &self.pipeline.config().processed_by,
            reports.len(),
            total_records,
            delta_records,
            elapsed,
        ));

        let processing_time_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        info!(
            request_id,
            succeeded = reports.len(),
            failed,
            processing_time_ms,
            "存储事件处理完成"
        );

        Ok(BatchReport {
            message: completion_message(mode.as_str(), failed),
            request_id: request_id.to_string(),
            results,
            processing_time_ms,
        })
    }

    async fn report_failure(&self, request_id: &str, input_file: Option<&str>, err: &PipelineError) {
        let config = self.pipeline.config();
        self.metrics
            .publish(&error_metrics(&config.processed_by, err.kind()));

        let notice = FailureNotice {
            recipient: config.support_email.clone(),
            correlation_id: request_id.to_string(),
            input_file: input_file.map(str::to_string),
            error_type: err.kind().to_string(),
            error_detail: err.to_string(),
        };
        if let Err(e) = self.notifier.notify(&notice).await {
            warn!(request_id, error = %e, "故障通知发送失败");
        }
    }
}

fn completion_message(mode: &str, failed: usize) -> String {
    if failed == 0 {
        format!("{} processing completed successfully", capitalize(mode))
    } else {
        format!(
            "{} processing completed with {} failed file(s)",
            capitalize(mode),
            failed
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
