//! HTTP プロバイダ メールアダプタ実装
//!
//! メール送信 API（既定は Resend 互換のエンドポイント）に JSON を 1 回 POST する。
//! 成功以外のステータスは [`MailError::ProviderRejected`] に変換する。

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use mailbridge_domain::{Mail, MailError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{AdapterContext, BaseMailAdapter, MailAdapter};

/// 既定の送信エンドポイント
pub const DEFAULT_HTTP_ENDPOINT: &str = "https://api.resend.com/emails";

/// HTTP プロバイダ オプション
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpOptions {
    /// API キー（`Authorization: Bearer` で送る）
    pub api_key:  String,
    /// 送信エンドポイント（省略時は [`DEFAULT_HTTP_ENDPOINT`]）
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// HTTP プロバイダ メールアダプタ
pub struct HttpMailAdapter {
    base:     BaseMailAdapter,
    client:   reqwest::Client,
    api_key:  String,
    endpoint: String,
    options:  Value,
}

impl HttpMailAdapter {
    /// 新しい HTTP アダプタを作成する
    ///
    /// オプションが [`HttpOptions`] に変換できない場合は [`MailError::Config`] を返す。
    pub fn new(options: Value, context: &AdapterContext) -> Result<Self, MailError> {
        let http: HttpOptions = serde_json::from_value(options.clone())
            .map_err(|e| MailError::Config(format!("HTTP オプションが不正: {e}")))?;

        Ok(Self {
            base: BaseMailAdapter::new(context.renderer.clone()),
            client: reqwest::Client::new(),
            api_key: http.api_key,
            endpoint: http
                .endpoint
                .unwrap_or_else(|| DEFAULT_HTTP_ENDPOINT.to_string()),
            options,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 送信ペイロードを構築する
    ///
    /// 送信オプションはトップレベルに展開する。メールのフィールドと同名のキーは無視する。
    fn build_payload(&self, mail: &Mail, body: String) -> Value {
        let mut payload = Map::new();
        payload.insert("from".to_string(), json!(mail.from()));
        payload.insert("to".to_string(), json!(mail.to().addresses()));
        payload.insert("subject".to_string(), json!(mail.subject()));
        payload.insert("html".to_string(), Value::String(body));

        if !mail.attachments().is_empty() {
            let attachments: Vec<Value> = mail
                .attachments()
                .iter()
                .map(|attachment| {
                    let mut value = json!({
                        "filename": attachment.name,
                        "content": STANDARD.encode(&attachment.content),
                    });
                    if let Some(content_type) = &attachment.content_type {
                        value["content_type"] = json!(content_type);
                    }
                    value
                })
                .collect();
            payload.insert("attachments".to_string(), Value::Array(attachments));
        }

        for (key, value) in mail.options() {
            payload.entry(key.clone()).or_insert_with(|| value.clone());
        }

        Value::Object(payload)
    }
}

#[async_trait]
impl MailAdapter for HttpMailAdapter {
    async fn send(&self, mail: &Mail) -> Result<(), MailError> {
        let body = self.base.generate_body_string(mail).await?;
        let payload = self.build_payload(mail, body);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::SendFailed(format!("HTTP 送信失敗: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let response_body = response.text().await.unwrap_or_default();
        tracing::warn!(
            status = status.as_u16(),
            body = %response_body,
            "HTTP プロバイダが送信を拒否"
        );
        Err(MailError::ProviderRejected {
            status:      status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        })
    }

    fn options(&self) -> &Value {
        &self.options
    }
}
