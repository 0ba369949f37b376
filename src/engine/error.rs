// ==========================================
// 库存增量同步 - 流水线错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 汇总导入 / 存储 / 导出三层错误，外加批次级失败
// ==========================================

use crate::exporter::ExportError;
use crate::importer::ImportError;
use crate::repository::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("事件格式错误: {0}")]
    InvalidEvent(String),

    #[error("批次内 {failed} 个文件全部处理失败，首个错误: {first_error}")]
    BatchFailed { failed: usize, first_error: String },
}

impl PipelineError {
    /// 错误类别（用于 Errors 指标的 ErrorType 维度）
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Import(e) => e.kind(),
            PipelineError::Storage(StorageError::NotFound { .. }) => "NotFound",
            PipelineError::Storage(_) => "StorageError",
            PipelineError::Export(_) => "ExportError",
            PipelineError::InvalidEvent(_) => "InvalidEvent",
            PipelineError::BatchFailed { .. } => "BatchFailed",
        }
    }
}

/// Result 类型别名
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_passes_through_import_error() {
        let err: PipelineError =
            ImportError::MissingColumns(vec!["Discontinued".to_string()]).into();
        assert_eq!(err.kind(), "MissingColumns");
        assert_eq!(err.to_string(), "缺少必需列: Discontinued");
    }

    #[test]
    fn test_kind_for_storage_errors() {
        let not_found: PipelineError = StorageError::NotFound {
            bucket: "b".to_string(),
            key: "k".to_string(),
        }
        .into();
        assert_eq!(not_found.kind(), "NotFound");

        let io: PipelineError = StorageError::Io("disk full".to_string()).into();
        assert_eq!(io.kind(), "StorageError");
    }
}
