//! # Mailer 設定
//!
//! 環境変数からメール送信の設定を読み込む。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `MAIL_CONFIG_PATH` | No | ドライバ一覧を記述した JSON ファイル（設定時は以下の SMTP / HTTP 変数を使わない） |
//! | `MAIL_DEFAULT_DRIVER` | No | デフォルトドライバ名（デフォルト: `local`、設定ファイルの値より優先） |
//! | `SMTP_HOST` | No | 設定すると `smtp` ドライバを登録する |
//! | `SMTP_PORT` | No | SMTP ポート（未設定なら `SMTP_SECURE` に応じて 465 / 587） |
//! | `SMTP_SECURE` | No | `true` で接続時から TLS を使う |
//! | `SMTP_STARTTLS` | No | `opportunistic` / `required` / `disabled`（未設定なら認証情報の有無で決まる） |
//! | `SMTP_USERNAME` / `SMTP_PASSWORD` | No | SMTP 認証情報（両方設定した場合のみ使用） |
//! | `MAIL_HTTP_API_KEY` | No | 設定すると `http` ドライバを登録する |
//! | `MAIL_HTTP_ENDPOINT` | No | HTTP プロバイダのエンドポイント |
//! | `MAIL_TEMPLATE_DIR` | No | テンプレートディレクトリ（デフォルト: `templates`） |
//! | `MAIL_LOCALES_PATH` | No | ロケールコンテキストの JSON ファイル |

use std::env;

use mailbridge_domain::{DriverEntry, LocaleContext, MailConfig, MailError};
use serde_json::{Map, Value, json};

/// Mailer の設定
#[derive(Debug, Clone, PartialEq)]
pub struct MailerConfig {
    /// ドライバ登録設定
    pub mail:          MailConfig,
    /// テンプレートファイルの glob
    pub template_glob: String,
    /// ロケールコンテキストのファイルパス
    pub locales_path:  Option<String>,
}

impl MailerConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, MailError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// キーから値を引く関数で設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MailError> {
        let mut mail = match lookup("MAIL_CONFIG_PATH") {
            Some(path) => MailConfig::from_file(path)?,
            None => Self::mail_config_from_lookup(&lookup)?,
        };
        if let Some(default_driver) = lookup("MAIL_DEFAULT_DRIVER") {
            mail.default_driver = default_driver;
        }

        let template_dir = lookup("MAIL_TEMPLATE_DIR").unwrap_or_else(|| "templates".to_string());

        Ok(Self {
            mail,
            template_glob: format!("{}/**/*", template_dir.trim_end_matches('/')),
            locales_path: lookup("MAIL_LOCALES_PATH"),
        })
    }

    /// 環境変数からドライバ一覧を組み立てる
    ///
    /// `local` は常に登録し、`smtp` / `http` は必要な変数がある場合のみ登録する。
    fn mail_config_from_lookup(
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<MailConfig, MailError> {
        let mut config =
            MailConfig::new("local").with_driver(DriverEntry::new("local", "local", json!({})));

        if let Some(host) = lookup("SMTP_HOST") {
            let secure = lookup("SMTP_SECURE").is_some_and(|v| v == "true" || v == "1");

            let mut options = Map::new();
            options.insert("host".to_string(), json!(host));
            if let Some(port) = lookup("SMTP_PORT") {
                let port: u16 = port.parse().map_err(|e| {
                    MailError::Config(format!("SMTP_PORT は有効なポート番号である必要があります: {e}"))
                })?;
                options.insert("port".to_string(), json!(port));
            }
            options.insert("secure".to_string(), json!(secure));
            if let Some(starttls) = lookup("SMTP_STARTTLS") {
                options.insert("starttls".to_string(), json!(starttls));
            }
            if let (Some(user), Some(pass)) = (lookup("SMTP_USERNAME"), lookup("SMTP_PASSWORD")) {
                options.insert("auth".to_string(), json!({ "user": user, "pass": pass }));
            }

            config = config.with_driver(DriverEntry::new("smtp", "smtp", Value::Object(options)));
        }

        if let Some(api_key) = lookup("MAIL_HTTP_API_KEY") {
            let mut options = Map::new();
            options.insert("api_key".to_string(), json!(api_key));
            if let Some(endpoint) = lookup("MAIL_HTTP_ENDPOINT") {
                options.insert("endpoint".to_string(), json!(endpoint));
            }

            config = config.with_driver(DriverEntry::new("http", "http", Value::Object(options)));
        }

        Ok(config)
    }

    /// ロケールコンテキストを読み込む（パス未設定なら空）
    pub fn load_locales(&self) -> Result<LocaleContext, MailError> {
        match &self.locales_path {
            Some(path) => LocaleContext::from_file(path),
            None => Ok(LocaleContext::default()),
        }
    }
}
