// ==========================================
// 库存增量同步 - 故障通知
// ==========================================
// 职责: 不可恢复故障时通知支持团队（收件人可配置）
// 约束: 通知必须携带错误详情与关联 ID
// ==========================================

use async_trait::async_trait;
use serde::Serialize;
use std::error::Error;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureNotice {
    pub recipient: String,
    pub correlation_id: String,
    /// 失败的输入文件（批次级失败时为空）
    pub input_file: Option<String>,
    pub error_type: String,
    pub error_detail: String,
}

// ==========================================
// ErrorNotifier Trait
// ==========================================
#[async_trait]
pub trait ErrorNotifier: Send + Sync {
    async fn notify(&self, notice: &FailureNotice) -> Result<(), Box<dyn Error + Send + Sync>>;
}

// ==========================================
// LogNotifier - 以错误日志投递
// ==========================================
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl ErrorNotifier for LogNotifier {
    async fn notify(&self, notice: &FailureNotice) -> Result<(), Box<dyn Error + Send + Sync>> {
        error!(
            recipient = %notice.recipient,
            correlation_id = %notice.correlation_id,
            input_file = notice.input_file.as_deref().unwrap_or("-"),
            error_type = %notice.error_type,
            error_detail = %notice.error_detail,
            "故障通知"
        );
        Ok(())
    }
}
