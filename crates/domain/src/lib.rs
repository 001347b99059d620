//! # Mailbridge ドメイン層
//!
//! メール送信の抽象化に関わる値オブジェクトとエラー型を定義する。
//!
//! ## 設計方針
//!
//! - **外部依存なし**: トランスポート（SMTP / HTTP）やテンプレートエンジンには依存しない
//! - **検証しない**: 宛先やテンプレートの妥当性はトランスポート・レンダリング段階で判明する
//! - **シリアライズ可能**: 設定ファイルや標準入力から JSON で読み込める
//!
//! ## モジュール構成
//!
//! - [`mail`] - メール本体（宛先、本文、添付ファイル、送信オプション）
//! - [`config`] - ドライバ登録設定
//! - [`locale`] - テンプレート本文に注入するロケールコンテキスト
//! - [`error`] - メール送信エラー

pub mod config;
pub mod error;
pub mod locale;
pub mod mail;

pub use config::{DriverEntry, MailConfig};
pub use error::MailError;
pub use locale::LocaleContext;
pub use mail::{Attachment, Mail, MailBody, MailOptions, Recipients, TemplateBody, TemplateData};
