// ==========================================
// 库存增量同步 - 流水线编排器
// ==========================================
// 用途: 单文件处理主流程
// 流程: 下载 → 规范化 → (增量模式) 读基线 → 计算变更 → 生成 CSV
//       → 写导出文件 → 写 latest → 覆盖基线
// 红线: 导出文件写成功之前不得覆盖基线
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::inventory::DeltaSummary;
use crate::domain::types::ProcessingMode;
use crate::engine::delta::DeltaEngine;
use crate::engine::error::PipelineResult;
use crate::exporter::CsvExporter;
use crate::importer::{detect_file_kind, ImportError, InventoryImporter};
use crate::repository::{BaselineRepository, ObjectStore, PutObject};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument};

const CSV_CONTENT_TYPE: &str = "text/csv";

// ==========================================
// FileReport - 单文件处理结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub input_file: String,
    pub output_file: String,
    pub mode: ProcessingMode,
    /// 规范化后的有效记录数
    pub total_records: usize,
    /// 导出文件中的数据行数
    pub exported_records: usize,
    /// 变更记录数（全量模式为 0）
    pub delta_records: usize,
    pub new_products: usize,
    pub updated_products: usize,
    pub deleted_products: usize,
    pub skipped_rows: usize,
    pub warnings: usize,
}

// ==========================================
// InventoryPipeline - 流水线编排器
// ==========================================
pub struct InventoryPipeline {
    config: PipelineConfig,
    store: Arc<dyn ObjectStore>,
    baseline: Arc<dyn BaselineRepository>,
    importer: InventoryImporter,
    delta_engine: DeltaEngine,
    exporter: CsvExporter,
}

impl InventoryPipeline {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 流水线配置（输出桶、模式、常量列）
    /// - store: 对象存储（读取输入、写出导出文件）
    /// - baseline: 基线仓储
    pub fn new(
        config: PipelineConfig,
        store: Arc<dyn ObjectStore>,
        baseline: Arc<dyn BaselineRepository>,
    ) -> Self {
        Self {
            exporter: CsvExporter::new(
                config.inventory_tracker.clone(),
                config.inventory_policy.clone(),
            ),
            importer: InventoryImporter::new(),
            delta_engine: DeltaEngine::new(),
            config,
            store,
            baseline,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 处理单个输入文件
    ///
    /// # 参数
    /// - bucket: 输入文件所在桶
    /// - key: 输入文件对象键
    /// - request_id: 关联 ID（写入对象元数据）
    ///
    /// # 返回
    /// 单文件处理结果；文件级错误原样返回，由调用方汇总
    #[instrument(skip(self), fields(mode = %self.config.mode))]
    pub async fn process_object(
        &self,
        bucket: &str,
        key: &str,
        request_id: &str,
    ) -> PipelineResult<FileReport> {
        // 扩展名不合法时不下载
        detect_file_kind(key)?;

        info!("开始处理文件");
        let bytes = self.store.get_object(bucket, key).await?;
        let table = self.importer.import_bytes(key, &bytes)?;

        let now = Utc::now();
        let output_file = output_key(self.config.mode, &self.config.output_prefix, key, now);

        // ==========================================
        // 步骤1: 生成导出内容
        // ==========================================
        let (body, exported_records, summary) = match self.config.mode {
            ProcessingMode::Full => {
                if table.records.is_empty() {
                    return Err(ImportError::NoValidRecords.into());
                }
                let body = self.exporter.render_full(&table.records)?;
                (body, table.records.len(), DeltaSummary::default())
            }
            ProcessingMode::Incremental => {
                let baseline = self.baseline.load().await?;
                let delta = self.delta_engine.compute(&table.records, &baseline);
                let summary = DeltaSummary::from_records(&delta);
                info!(
                    baseline_records = baseline.len(),
                    new = summary.new,
                    updated = summary.updated,
                    deleted = summary.deleted,
                    "变更集计算完成"
                );
                (self.exporter.render_delta(&delta)?, delta.len(), summary)
            }
        };

        // ==========================================
        // 步骤2: 写导出文件（失败即终止，基线保持不变）
        // ==========================================
        let object = self.output_object(body, request_id, now);
        self.store
            .put_object(&self.config.bucket, &output_file, object.clone())
            .await?;
        info!(output = %output_file, rows = exported_records, "导出文件已写入");

        // ==========================================
        // 步骤3: 覆盖 latest（失败只记日志）
        // ==========================================
        let latest_key = self.config.latest_key();
        if let Err(e) = self
            .store
            .put_object(&self.config.bucket, &latest_key, object)
            .await
        {
            error!(key = %latest_key, error = %e, "latest 文件写入失败，继续执行");
        }

        // ==========================================
        // 步骤4: 覆盖基线
        // ==========================================
        self.baseline.save(&table.records, request_id).await?;

        let report = FileReport {
            input_file: key.to_string(),
            output_file,
            mode: self.config.mode,
            total_records: table.records.len(),
            exported_records,
            delta_records: summary.total(),
            new_products: summary.new,
            updated_products: summary.updated,
            deleted_products: summary.deleted,
            skipped_rows: table.skipped_rows(),
            warnings: table.warnings.len(),
        };

        info!(
            total_records = report.total_records,
            delta_records = report.delta_records,
            skipped_rows = report.skipped_rows,
            "文件处理完成"
        );
        Ok(report)
    }

    fn output_object(&self, body: Vec<u8>, request_id: &str, at: DateTime<Utc>) -> PutObject {
        PutObject::new(body, CSV_CONTENT_TYPE)
            .with_metadata("processed-by", self.config.processed_by.as_str())
            .with_metadata("processed-at", at.to_rfc3339_opts(SecondsFormat::Millis, true))
            .with_metadata("request-id", request_id)
    }
}

/// 计算导出文件键
///
/// # 返回
/// - Full: `{prefix}/{base}-{ts}.csv`
/// - Incremental: `{prefix}/delta/{base}-delta-{ts}.csv`
///
/// `{base}` 为输入键的文件名主干，`{ts}` 为毫秒精度 UTC 时间（`:` `.` 替换为 `-`）
pub fn output_key(
    mode: ProcessingMode,
    prefix: &str,
    input_key: &str,
    at: DateTime<Utc>,
) -> String {
    let base = Path::new(input_key)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("inventory");
    let ts = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");

    match mode {
        ProcessingMode::Full => format!("{}/{}-{}.csv", prefix, base, ts),
        ProcessingMode::Incremental => format!("{}/delta/{}-delta-{}.csv", prefix, base, ts),
    }
}
