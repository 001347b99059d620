//! # ユースケース
//!
//! - [`mail_service`] - ドライバ登録 + ロケール注入 + 送信の統合サービス

pub mod mail_service;

pub use mail_service::MailService;
