// ==========================================
// 库存增量同步 - 命令行入口
// ==========================================
// 用法:
//   inventory-sync event <event.json>         处理存储通知事件文件
//   inventory-sync process <bucket> <key>...  按参数构造事件并处理
//   inventory-sync baseline                   查看当前基线记录数
// ==========================================

use anyhow::{bail, Context};
use inventory_sync::app::{AppState, StorageEvent};
use inventory_sync::config::{config_keys, PipelineConfig};
use inventory_sync::logging;

const USAGE: &str = "用法:
  inventory-sync event <event.json>
  inventory-sync process <bucket> <key>...
  inventory-sync baseline";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时忽略
    let _ = dotenvy::dotenv();

    let config = PipelineConfig::from_env()?;
    logging::init(&config.log_level);

    tracing::info!("==================================================");
    tracing::info!("库存增量同步 v{}", inventory_sync::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_default();
    let rest: Vec<String> = args.collect();

    let state = AppState::from_config(config).context("无法初始化AppState")?;

    match command.as_str() {
        "event" => {
            let path = rest.first().context(USAGE)?;
            let bytes = std::fs::read(path).with_context(|| format!("无法读取事件文件: {}", path))?;
            let event = StorageEvent::from_json(&bytes)?;
            run_event(&state, &event).await
        }
        "process" => {
            let (bucket, keys) = match rest.split_first() {
                Some((bucket, keys)) if !keys.is_empty() => (bucket, keys),
                _ => bail!(USAGE),
            };
            let event = StorageEvent::from_objects(keys.iter().map(|k| (bucket.as_str(), k)));
            run_event(&state, &event).await
        }
        "baseline" => {
            let records = state.baseline.load().await?;
            println!("baseline_records={}", records.len());
            Ok(())
        }
        _ => bail!(USAGE),
    }
}

async fn run_event(state: &AppState, event: &StorageEvent) -> anyhow::Result<()> {
    let request_id = request_id();
    let report = state.handler.handle(event, &request_id).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// 关联 ID：优先取环境变量，否则生成 UUID v4
fn request_id() -> String {
    std::env::var(config_keys::REQUEST_ID)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
