// ==========================================
// 库存增量同步 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 基线表建表（幂等）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 基线快照表
const BASELINE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS baseline_snapshot (
    slot_key     TEXT PRIMARY KEY,
    payload      TEXT NOT NULL,
    record_count INTEGER NOT NULL,
    saved_at     TEXT NOT NULL,
    request_id   TEXT
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 创建基线表（已存在则跳过）
pub fn init_baseline_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(BASELINE_SCHEMA)
}
