//! Local メールアダプタ実装
//!
//! メールを実際に送信せず、解決済みの内容をロガーに出力する。
//! 開発環境で使用する。

use std::sync::Arc;

use async_trait::async_trait;
use mailbridge_domain::{Mail, MailError};
use serde_json::{Value, json};

use super::{AdapterContext, BaseMailAdapter, MailAdapter};
use crate::logger::MailLogger;

/// Local メールアダプタ（ログ出力のみ）
///
/// オプションは受け取るが使わない。
pub struct LocalMailAdapter {
    base:    BaseMailAdapter,
    logger:  Arc<dyn MailLogger>,
    options: Value,
}

impl LocalMailAdapter {
    pub fn new(options: Value, context: &AdapterContext) -> Self {
        Self {
            base: BaseMailAdapter::new(context.renderer.clone()),
            logger: context.logger.clone(),
            options,
        }
    }
}

#[async_trait]
impl MailAdapter for LocalMailAdapter {
    async fn send(&self, mail: &Mail) -> Result<(), MailError> {
        let body = self.base.generate_body_string(mail).await?;

        let attachments: Vec<Value> = mail
            .attachments()
            .iter()
            .map(|attachment| {
                json!({
                    "name": attachment.name,
                    "content_type": attachment.content_type,
                    "size": attachment.content.len(),
                })
            })
            .collect();

        self.logger.info(
            "Local: メールをログに出力",
            &json!({
                "to": mail.to(),
                "from": mail.from(),
                "subject": mail.subject(),
                "body": body,
                "attachments": attachments,
            }),
        );
        Ok(())
    }

    fn options(&self) -> &Value {
        &self.options
    }
}
