//! # メール送信エラー
//!
//! ドライバ解決・テンプレートレンダリング・トランスポートの各段階で発生するエラーを
//! 1 つの enum で表現する。`MailService` はこのエラーをログ出力した後、そのまま呼び出し元に返す。

use strum::IntoStaticStr;
use thiserror::Error;

/// メール送信エラー
///
/// [`kind()`](MailError::kind) で snake_case のエラー種別名を取得できる（ログの `error.kind` 用）。
#[derive(Debug, Clone, PartialEq, Eq, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum MailError {
    /// 指定された名前のドライバが登録されていない
    ///
    /// `boot()` 前の送信もこのエラーになる。
    #[error("ドライバが登録されていません: {0}")]
    UnknownDriver(String),

    /// 設定エラー
    ///
    /// 未知のドライバファクトリ、ドライバに合わないオプション、設定ファイルの読み込み失敗など。
    #[error("設定エラー: {0}")]
    Config(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// メールアドレスが不正
    #[error("メールアドレスが不正です: {0}")]
    InvalidAddress(String),

    /// トランスポートでの送信に失敗（ネットワーク、認証など）
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// HTTP プロバイダが成功以外のステータスを返した
    #[error("プロバイダがリクエストを拒否しました: {status} {status_text}")]
    ProviderRejected {
        /// HTTP ステータスコード
        status:      u16,
        /// ステータステキスト（例: "Unauthorized"）
        status_text: String,
    },
}

impl MailError {
    /// エラー種別名を返す
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}
