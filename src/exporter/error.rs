// ==========================================
// 库存增量同步 - 导出模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 生成失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV 缓冲区刷新失败: {0}")]
    Flush(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
