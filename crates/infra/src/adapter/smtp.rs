//! SMTP メールアダプタ実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! トランスポートは生成時に 1 度だけ構築し、送信ごとに再利用する。
//!
//! ## TLS
//!
//! - `secure: true`: 接続時から TLS（implicit TLS、既定ポート 465）
//! - `secure: false`: STARTTLS（既定ポート 587）。認証情報がある場合は STARTTLS 必須で、
//!   平文のまま AUTH しない。`starttls: "disabled"` を明示したときだけ平文で送る

use std::fmt;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{
        Attachment as LettreAttachment,
        Mailbox,
        Message,
        MultiPart,
        SinglePart,
        header::ContentType,
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use mailbridge_domain::{Mail, MailError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AdapterContext, BaseMailAdapter, MailAdapter};

/// SMTP 接続オプション
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpOptions {
    /// SMTP サーバーのホスト名
    pub host:     String,
    /// ポート番号（省略時は secure なら 465、そうでなければ 587）
    #[serde(default)]
    pub port:     Option<u16>,
    /// 接続時から TLS を使う
    #[serde(default)]
    pub secure:   bool,
    /// STARTTLS の扱い（`secure` が false のときのみ参照）
    #[serde(default)]
    pub starttls: Option<StartTls>,
    /// 認証情報
    #[serde(default)]
    pub auth:     Option<SmtpAuth>,
}

/// STARTTLS の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartTls {
    /// サーバーが対応していれば STARTTLS する
    Opportunistic,
    /// STARTTLS できないサーバーには送信しない
    Required,
    /// 平文のまま送る（Mailpit 等のローカル SMTP 向け）
    Disabled,
}

/// SMTP 認証情報
///
/// `Debug` 出力ではパスワードを伏せる。
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpAuth {
    pub user: String,
    pub pass: String,
}

impl fmt::Debug for SmtpAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpAuth")
            .field("user", &self.user)
            .field("pass", &"***")
            .finish()
    }
}

impl SmtpOptions {
    /// 実際に接続するポート番号
    pub fn effective_port(&self) -> u16 {
        match (self.port, self.secure) {
            (Some(port), _) => port,
            (None, true) => 465,
            (None, false) => 587,
        }
    }

    /// 実際に使う STARTTLS の扱い
    ///
    /// 未指定の場合、認証情報があれば `Required`（平文で AUTH しない）、なければ `Opportunistic`。
    pub fn effective_starttls(&self) -> StartTls {
        match (self.starttls, &self.auth) {
            (Some(starttls), _) => starttls,
            (None, Some(_)) => StartTls::Required,
            (None, None) => StartTls::Opportunistic,
        }
    }
}

/// SMTP メールアダプタ
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpMailAdapter {
    base:      BaseMailAdapter,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    options:   Value,
}

impl SmtpMailAdapter {
    /// 新しい SMTP アダプタを作成する
    ///
    /// オプションが [`SmtpOptions`] に変換できない場合は [`MailError::Config`] を返す。
    /// この時点ではサーバーに接続しない。
    pub fn new(options: Value, context: &AdapterContext) -> Result<Self, MailError> {
        let smtp: SmtpOptions = serde_json::from_value(options.clone())
            .map_err(|e| MailError::Config(format!("SMTP オプションが不正: {e}")))?;

        let builder = if smtp.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
                .map_err(|e| MailError::Config(format!("SMTP TLS 設定に失敗: {e}")))?
        } else {
            let tls = match smtp.effective_starttls() {
                StartTls::Opportunistic => Tls::Opportunistic(tls_parameters(&smtp.host)?),
                StartTls::Required => Tls::Required(tls_parameters(&smtp.host)?),
                StartTls::Disabled => Tls::None,
            };
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host).tls(tls)
        };

        let mut builder = builder.port(smtp.effective_port());
        if let Some(auth) = smtp.auth {
            builder = builder.credentials(Credentials::new(auth.user, auth.pass));
        }

        Ok(Self {
            base: BaseMailAdapter::new(context.renderer.clone()),
            transport: builder.build(),
            options,
        })
    }

    /// 解決済みの本文から送信メッセージを構築する
    ///
    /// 本文は HTML として送る。`cc` / `bcc` / `reply_to` オプションは
    /// 文字列または文字列の配列で指定する。
    fn build_message(&self, mail: &Mail, body: String) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(mail.from())?)
            .subject(mail.subject());

        for address in mail.to().addresses() {
            builder = builder.to(parse_mailbox(address)?);
        }
        for address in option_addresses(mail, "cc") {
            builder = builder.cc(parse_mailbox(address)?);
        }
        for address in option_addresses(mail, "bcc") {
            builder = builder.bcc(parse_mailbox(address)?);
        }
        if let Some(address) = mail.option_str("reply_to") {
            builder = builder.reply_to(parse_mailbox(address)?);
        }

        let html = SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(body);

        let message = if mail.attachments().is_empty() {
            builder.singlepart(html)
        } else {
            let mut multipart = MultiPart::mixed().singlepart(html);
            for attachment in mail.attachments() {
                let content_type = ContentType::parse(
                    attachment
                        .content_type
                        .as_deref()
                        .unwrap_or("application/octet-stream"),
                )
                .map_err(|e| {
                    MailError::SendFailed(format!(
                        "添付ファイルの Content-Type が不正: {}: {e}",
                        attachment.name
                    ))
                })?;
                multipart = multipart.singlepart(
                    LettreAttachment::new(attachment.name.clone())
                        .body(attachment.content.clone(), content_type),
                );
            }
            builder.multipart(multipart)
        };

        message.map_err(|e| MailError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }
}

fn tls_parameters(host: &str) -> Result<TlsParameters, MailError> {
    TlsParameters::new(host.to_string())
        .map_err(|e| MailError::Config(format!("SMTP TLS 設定に失敗: {e}")))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|e| MailError::InvalidAddress(format!("{address}: {e}")))
}

fn option_addresses<'a>(mail: &'a Mail, key: &str) -> Vec<&'a str> {
    match mail.options().get(key) {
        Some(Value::String(address)) => vec![address.as_str()],
        Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

#[async_trait]
impl MailAdapter for SmtpMailAdapter {
    async fn send(&self, mail: &Mail) -> Result<(), MailError> {
        let body = self.base.generate_body_string(mail).await?;
        let message = self.build_message(mail, body)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }

    fn options(&self) -> &Value {
        &self.options
    }
}
