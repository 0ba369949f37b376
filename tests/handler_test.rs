// ==========================================
// EventHandler 集成测试
// ==========================================
// 测试范围:
// 1. 批次汇总: 部分失败 / 全部失败 / 空事件
// 2. 故障通知与错误指标
// 3. AppState 组装: 本地文件存储 + SQLite 基线
// ==========================================

mod helpers;

use async_trait::async_trait;
use helpers::memory_store::MemoryObjectStore;
use helpers::test_data_builder::{csv_bytes, inventory_csv};
use helpers::{test_config, INPUT_BUCKET};
use inventory_sync::app::{build_baseline_repository, AppState, FileResult, StorageEvent};
use inventory_sync::config::BaselineBackend;
use inventory_sync::domain::ProcessingMode;
use inventory_sync::engine::PipelineError;
use inventory_sync::metrics::{MetricDatum, MetricsSink};
use inventory_sync::notifier::{ErrorNotifier, FailureNotice};
use inventory_sync::logging;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ==========================================
// 记录型指标 / 通知实现
// ==========================================

#[derive(Default)]
struct RecordingMetrics {
    published: Mutex<Vec<MetricDatum>>,
}

impl RecordingMetrics {
    fn names(&self) -> Vec<&'static str> {
        self.published.lock().unwrap().iter().map(|m| m.name).collect()
    }

    fn value_of(&self, name: &str) -> Option<f64> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.value)
    }
}

impl MetricsSink for RecordingMetrics {
    fn publish(&self, metrics: &[MetricDatum]) {
        self.published.lock().unwrap().extend_from_slice(metrics);
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<FailureNotice>>,
}

#[async_trait]
impl ErrorNotifier for RecordingNotifier {
    async fn notify(&self, notice: &FailureNotice) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

struct Fixture {
    _dir: TempDir,
    store: Arc<MemoryObjectStore>,
    metrics: Arc<RecordingMetrics>,
    notifier: Arc<RecordingNotifier>,
    state: AppState,
}

fn fixture() -> Fixture {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let config = test_config(ProcessingMode::Incremental, dir.path());
    let store = Arc::new(MemoryObjectStore::new());
    let metrics = Arc::new(RecordingMetrics::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let baseline = build_baseline_repository(&config, store.clone()).unwrap();
    let state = AppState::with_components(
        config,
        store.clone(),
        baseline,
        metrics.clone(),
        notifier.clone(),
    );
    Fixture {
        _dir: dir,
        store,
        metrics,
        notifier,
        state,
    }
}

fn event(keys: &[&str]) -> StorageEvent {
    StorageEvent::from_objects(keys.iter().map(|k| (INPUT_BUCKET, *k)))
}

// ==========================================
// 批次汇总
// ==========================================

#[tokio::test]
async fn test_partial_failure_is_reported_per_file() {
    let f = fixture();
    f.store.insert(
        INPUT_BUCKET,
        "incoming/good.csv",
        inventory_csv(&[("A", "5", "No"), ("B", "2", "No")]),
    );
    f.store.insert(
        INPUT_BUCKET,
        "incoming/bad.csv",
        csv_bytes(&[&["UPC", "Available Qty"], &["A", "5"]]),
    );

    let report = f
        .state
        .handler
        .handle(&event(&["incoming/good.csv", "incoming/bad.csv"]), "req-batch")
        .await
        .unwrap();

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.request_id, "req-batch");
    assert_eq!(
        report.message,
        "Incremental processing completed with 1 failed file(s)"
    );

    let good = report.results[0].report().unwrap();
    assert_eq!(good.input_file, "incoming/good.csv");
    assert_eq!(good.new_products, 2);

    match &report.results[1] {
        FileResult::Failed {
            input_file,
            error_type,
            error,
        } => {
            assert_eq!(input_file, "incoming/bad.csv");
            assert_eq!(error_type, "MissingColumns");
            assert!(error.contains("Discontinued"));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // 失败文件触发通知
    let notices = f.notifier.notices.lock().unwrap().clone();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].recipient, "support@valleyridge.ca");
    assert_eq!(notices[0].correlation_id, "req-batch");
    assert_eq!(notices[0].input_file.as_deref(), Some("incoming/bad.csv"));
    assert_eq!(notices[0].error_type, "MissingColumns");

    // 错误指标 + 批次指标（只统计成功文件）
    assert_eq!(
        f.metrics.names(),
        vec![
            "Errors",
            "FilesProcessed",
            "TotalRecordsProcessed",
            "DeltaRecordsGenerated",
            "ProcessingTime"
        ]
    );
    assert_eq!(f.metrics.value_of("FilesProcessed"), Some(1.0));
    assert_eq!(f.metrics.value_of("TotalRecordsProcessed"), Some(2.0));
    assert_eq!(f.metrics.value_of("DeltaRecordsGenerated"), Some(2.0));
}

#[tokio::test]
async fn test_all_files_failing_returns_batch_failed() {
    let f = fixture();
    f.store
        .insert(INPUT_BUCKET, "incoming/one.csv", csv_bytes(&[&["UPC"], &["A"]]));

    let err = f
        .state
        .handler
        .handle(&event(&["incoming/one.csv", "incoming/missing.csv"]), "req-x")
        .await
        .unwrap_err();

    match err {
        PipelineError::BatchFailed {
            failed,
            first_error,
        } => {
            assert_eq!(failed, 2);
            assert!(first_error.contains("Available Qty"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(f.notifier.notices.lock().unwrap().len(), 2);
    assert!(!f.metrics.names().contains(&"FilesProcessed"));
    // 每个失败文件只计一次 Errors，批次失败不额外计数
    assert_eq!(f.metrics.names(), vec!["Errors", "Errors"]);
}

#[tokio::test]
async fn test_empty_event_succeeds_with_no_results() {
    let f = fixture();

    let report = f
        .state
        .handler
        .handle(&StorageEvent::default(), "req-empty")
        .await
        .unwrap();

    assert!(report.results.is_empty());
    assert_eq!(report.message, "Incremental processing completed successfully");
    assert_eq!(f.metrics.value_of("FilesProcessed"), Some(0.0));
}

#[tokio::test]
async fn test_encoded_keys_are_decoded_before_processing() {
    let f = fixture();
    f.store.insert(
        INPUT_BUCKET,
        "incoming/Stock List (May).csv",
        inventory_csv(&[("A", "1", "No")]),
    );
    let json = format!(
        r#"{{"Records":[{{"s3":{{"bucket":{{"name":"{}"}},"object":{{"key":"incoming/Stock+List+%28May%29.csv"}}}}}}]}}"#,
        INPUT_BUCKET
    );
    let event = StorageEvent::from_json(json.as_bytes()).unwrap();

    let report = f.state.handler.handle(&event, "req-enc").await.unwrap();

    let file = report.results[0].report().unwrap();
    assert_eq!(file.input_file, "incoming/Stock List (May).csv");
    assert!(file
        .output_file
        .starts_with("processed/delta/Stock List (May)-delta-"));
}

#[tokio::test]
async fn test_batch_report_serializes_for_host() {
    let f = fixture();
    f.store
        .insert(INPUT_BUCKET, "incoming/a.csv", inventory_csv(&[("A", "1", "No")]));

    let report = f
        .state
        .handler
        .handle(&event(&["incoming/a.csv"]), "req-json")
        .await
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["requestId"], "req-json");
    assert!(json["processingTime"].is_u64());
    assert_eq!(json["results"][0]["status"], "success");
    assert_eq!(json["results"][0]["inputFile"], "incoming/a.csv");
    assert_eq!(json["results"][0]["newProducts"], 1);
    assert_eq!(json["results"][0]["mode"], "incremental");
}

// ==========================================
// AppState: 本地存储 + SQLite 基线
// ==========================================

#[tokio::test]
async fn test_app_state_with_local_store_and_sqlite_baseline() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let mut config = test_config(ProcessingMode::Incremental, dir.path());
    config.baseline_backend = BaselineBackend::Sqlite;

    let state = AppState::from_config(config.clone()).unwrap();
    let input = dir.path().join(INPUT_BUCKET).join("incoming");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::write(
        input.join("day1.csv"),
        inventory_csv(&[("A", "5", "No"), ("B", "1", "Yes")]),
    )
    .unwrap();
    std::fs::write(input.join("day2.csv"), inventory_csv(&[("A", "6", "No")])).unwrap();

    state
        .handler
        .handle(&event(&["incoming/day1.csv"]), "req-1")
        .await
        .unwrap();
    let report = state
        .handler
        .handle(&event(&["incoming/day2.csv"]), "req-2")
        .await
        .unwrap();

    let file = report.results[0].report().unwrap();
    assert_eq!(file.updated_products, 1);
    assert_eq!(file.deleted_products, 1);

    // 导出文件落在 {root}/{bucket}/{key}
    let output = dir.path().join(&config.bucket).join(&file.output_file);
    let text = std::fs::read_to_string(output).unwrap();
    assert!(text.contains("A,6,No,shopify,deny,updated,Quantity changed from 5 to 6"));
    assert!(text.contains("B,0,Yes,shopify,deny,deleted,Product removed from inventory"));

    let baseline = state.baseline.load().await.unwrap();
    assert_eq!(baseline.len(), 1);
    assert_eq!(baseline[0].identifier, "A");
    assert_eq!(baseline[0].quantity, 6);
}
