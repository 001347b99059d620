//! # ロガー
//!
//! Local ドライバの出力と `MailService` の失敗ログの出力先を抽象化する。
//! 本番では [`TracingMailLogger`] を使い、テストでは記録用のモックに差し替える。

use mailbridge_domain::MailError;
use mailbridge_shared::event_log::error::category;
use serde_json::Value;

/// ロガートレイト
pub trait MailLogger: Send + Sync {
    /// 構造化コンテキスト付きの情報ログ
    fn info(&self, message: &str, context: &Value);

    /// エラーログ
    fn error(&self, error: &MailError);
}

/// tracing に出力するロガー
#[derive(Debug, Clone, Default)]
pub struct TracingMailLogger;

impl MailLogger for TracingMailLogger {
    fn info(&self, message: &str, context: &Value) {
        tracing::info!(context = %context, "{message}");
    }

    fn error(&self, error: &MailError) {
        tracing::error!(
            error.category = error_category(error),
            error.kind = error.kind(),
            error = %error,
            "メール送信に失敗"
        );
    }
}

/// エラー種別からログの `error.category` を決める
pub fn error_category(error: &MailError) -> &'static str {
    match error {
        MailError::UnknownDriver(_) | MailError::Config(_) => category::CONFIGURATION,
        MailError::TemplateFailed(_) => category::RENDERING,
        MailError::InvalidAddress(_)
        | MailError::SendFailed(_)
        | MailError::ProviderRejected { .. } => category::EXTERNAL_SERVICE,
    }
}
