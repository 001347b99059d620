//! # Mailbridge 共有ユーティリティ
//!
//! このクレートは、Mailbridge プロジェクト全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain を除く infra, mailer）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は feature で必要な分だけ有効にする

pub mod event_log;
pub mod observability;
