//! # Mailer ライブラリ
//!
//! メール送信サービス（ドライバの登録・解決・送信）と、環境変数からの設定読み込みを公開する。
//! バイナリ `mailer` と統合テストから利用する。

pub mod config;
pub mod usecase;

pub use config::MailerConfig;
pub use usecase::MailService;
