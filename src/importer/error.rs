// ==========================================
// 库存增量同步 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 文件级致命错误；行级问题只产生警告，不进入此枚举
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件类型不支持: {0}（仅支持 .xlsx/.xls/.csv 或无扩展名）")]
    UnsupportedFileType(String),

    #[error("无法识别的表格格式: {0}")]
    InvalidInputFormat(String),

    // ===== 表格结构错误 =====
    #[error("缺少必需列: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("表格至少需要一行表头和一行数据，实际 {rows} 行")]
    EmptyInput { rows: usize },

    #[error("没有可导出的有效记录")]
    NoValidRecords,
}

impl ImportError {
    /// 错误类别（用于指标维度）
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::UnsupportedFileType(_) => "UnsupportedFileType",
            ImportError::InvalidInputFormat(_) => "InvalidInputFormat",
            ImportError::MissingColumns(_) => "MissingColumns",
            ImportError::EmptyInput { .. } => "EmptyInput",
            ImportError::NoValidRecords => "NoValidRecords",
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::InvalidInputFormat(format!("CSV 解析失败: {}", err))
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::InvalidInputFormat(format!("Excel 解析失败: {}", err))
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_every_column() {
        let err = ImportError::MissingColumns(vec![
            "Available Qty".to_string(),
            "Discontinued".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("Available Qty, Discontinued"));
        assert_eq!(err.kind(), "MissingColumns");
    }
}
