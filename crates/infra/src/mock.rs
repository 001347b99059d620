//! # テスト用モック
//!
//! ドライバ・レンダラー・ロガーのインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! mailbridge-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mailbridge_domain::{Mail, MailError, TemplateData};
use serde_json::{Value, json};

use crate::{adapter::MailAdapter, logger::MailLogger, renderer::ViewRenderer};

// ===== MockMailAdapter =====

/// 送信したメールを記録するドライバ
#[derive(Clone)]
pub struct MockMailAdapter {
    options: Value,
    sent:    Arc<Mutex<Vec<Mail>>>,
    failure: Option<MailError>,
}

impl Default for MockMailAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMailAdapter {
    pub fn new() -> Self {
        Self::with_options(json!({}))
    }

    pub fn with_options(options: Value) -> Self {
        Self {
            options,
            sent: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    /// 常に指定したエラーを返すドライバ
    pub fn failing(error: MailError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    pub fn sent_mails(&self) -> Vec<Mail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailAdapter for MockMailAdapter {
    async fn send(&self, mail: &Mail) -> Result<(), MailError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }

    fn options(&self) -> &Value {
        &self.options
    }
}

// ===== MockViewRenderer =====

/// 呼び出しを記録するレンダラー
///
/// 成功時は `rendered:{view}` を返す。
#[derive(Clone, Default)]
pub struct MockViewRenderer {
    calls:   Arc<Mutex<Vec<(String, TemplateData)>>>,
    failure: Option<String>,
}

impl MockViewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に [`MailError::TemplateFailed`] を返すレンダラー
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            calls:   Arc::new(Mutex::new(Vec::new())),
            failure: Some(message.into()),
        }
    }

    /// 受け取った (view, data) の一覧
    pub fn calls(&self) -> Vec<(String, TemplateData)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ViewRenderer for MockViewRenderer {
    async fn render(&self, view: &str, data: &TemplateData) -> Result<String, MailError> {
        self.calls
            .lock()
            .unwrap()
            .push((view.to_string(), data.clone()));
        match &self.failure {
            Some(message) => Err(MailError::TemplateFailed(message.clone())),
            None => Ok(format!("rendered:{view}")),
        }
    }
}

// ===== RecordingMailLogger =====

/// 出力を記録するロガー
#[derive(Clone, Default)]
pub struct RecordingMailLogger {
    infos:  Arc<Mutex<Vec<(String, Value)>>>,
    errors: Arc<Mutex<Vec<MailError>>>,
}

impl RecordingMailLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn infos(&self) -> Vec<(String, Value)> {
        self.infos.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<MailError> {
        self.errors.lock().unwrap().clone()
    }
}

impl MailLogger for RecordingMailLogger {
    fn info(&self, message: &str, context: &Value) {
        self.infos
            .lock()
            .unwrap()
            .push((message.to_string(), context.clone()));
    }

    fn error(&self, error: &MailError) {
        self.errors.lock().unwrap().push(error.clone());
    }
}
