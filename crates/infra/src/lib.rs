//! # Mailbridge インフラ層
//!
//! メール送信の具体的な手段（ドライバ）と、ドライバが依存する外部機能を提供する。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MailAdapter` でドライバを、`ViewRenderer` / `MailLogger` で
//!   外部依存を抽象化する
//! - **3 つの組み込みドライバ**: Local（ログ出力のみ）、SMTP（lettre）、HTTP（reqwest）
//! - **依存性注入**: ロガーとレンダラーはドライバ生成時に [`AdapterContext`] で渡す
//!
//! ## 依存関係
//!
//! ```text
//! mailer → infra → domain
//!            ↘
//!             shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`adapter`] - `MailAdapter` トレイト、共通の本文解決、組み込みドライバ
//! - [`factory`] - ドライバファクトリ（設定のドライバキー → ドライバ生成）
//! - [`renderer`] - テンプレートレンダリング（tera）
//! - [`logger`] - ロガー（tracing）

pub mod adapter;
pub mod factory;
pub mod logger;
pub mod renderer;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use adapter::{
    AdapterContext,
    BaseMailAdapter,
    HttpMailAdapter,
    LocalMailAdapter,
    MailAdapter,
    SmtpMailAdapter,
};
pub use factory::{AdapterFactories, AdapterFactory, BuiltinDriver};
pub use logger::{MailLogger, TracingMailLogger};
pub use renderer::{TeraViewRenderer, ViewRenderer};
