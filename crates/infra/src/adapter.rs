//! # メールアダプタ
//!
//! メール送信の具体的な手段（ドライバ）を抽象化する。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MailAdapter` でドライバを抽象化し、`Arc<dyn MailAdapter>` で保持する
//! - **3 つの組み込み実装**: Local（開発用、ログ出力のみ）、SMTP（lettre）、HTTP プロバイダ（reqwest）
//! - **本文解決の共通化**: 文字列 / テンプレートの本文解決は [`BaseMailAdapter`] に委譲する
//! - **リトライしない**: 1 回の送信失敗はそのまま呼び出し元へ返す

mod http;
mod local;
mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
pub use http::{DEFAULT_HTTP_ENDPOINT, HttpMailAdapter, HttpOptions};
pub use local::LocalMailAdapter;
use mailbridge_domain::{Mail, MailBody, MailError};
use serde::de::DeserializeOwned;
use serde_json::Value;
pub use smtp::{SmtpAuth, SmtpMailAdapter, SmtpOptions, StartTls};

use crate::{logger::MailLogger, renderer::ViewRenderer};

/// メールアダプタトレイト
#[async_trait]
pub trait MailAdapter: Send + Sync {
    /// メールを送信する
    ///
    /// 本文（文字列またはテンプレート）を解決してからトランスポートに渡す。
    async fn send(&self, mail: &Mail) -> Result<(), MailError>;

    /// 生成時に渡されたオプション
    fn options(&self) -> &Value;
}

impl dyn MailAdapter {
    /// 生成時のオプションを呼び出し側が指定した型で取得する
    pub fn get_options<T: DeserializeOwned>(&self) -> Result<T, MailError> {
        serde_json::from_value(self.options().clone())
            .map_err(|e| MailError::Config(format!("オプションの変換に失敗: {e}")))
    }
}

/// ドライバ生成時に注入する依存
#[derive(Clone)]
pub struct AdapterContext {
    pub logger:   Arc<dyn MailLogger>,
    pub renderer: Arc<dyn ViewRenderer>,
}

impl AdapterContext {
    pub fn new(logger: Arc<dyn MailLogger>, renderer: Arc<dyn ViewRenderer>) -> Self {
        Self { logger, renderer }
    }
}

/// ドライバ共通の本文解決
#[derive(Clone)]
pub struct BaseMailAdapter {
    renderer: Arc<dyn ViewRenderer>,
}

impl BaseMailAdapter {
    pub fn new(renderer: Arc<dyn ViewRenderer>) -> Self {
        Self { renderer }
    }

    /// 本文を文字列に解決する
    ///
    /// 文字列本文はそのまま返し、テンプレート本文はレンダラーでレンダリングする。
    /// レンダリング失敗はそのまま返す。
    pub async fn generate_body_string(&self, mail: &Mail) -> Result<String, MailError> {
        match mail.body() {
            MailBody::Text(text) => Ok(text.clone()),
            MailBody::Template(template) => {
                self.renderer.render(&template.view, &template.data).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::mock::{MockMailAdapter, MockViewRenderer};

    #[tokio::test]
    async fn test_文字列本文はレンダラーを呼ばずにそのまま返す() {
        let renderer = MockViewRenderer::new();
        let base = BaseMailAdapter::new(Arc::new(renderer.clone()));
        let mail = Mail::new("a@b.com", "c@d.com", "Hi", "Hello");

        let body = base.generate_body_string(&mail).await.unwrap();

        assert_eq!(body, "Hello");
        assert!(renderer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_テンプレート本文はレンダラーの結果を返す() {
        let renderer = MockViewRenderer::new();
        let base = BaseMailAdapter::new(Arc::new(renderer.clone()));
        let mut data = mailbridge_domain::TemplateData::new();
        data.insert("a".to_string(), json!(1));
        let mail = Mail::new(
            "a@b.com",
            "c@d.com",
            "Hi",
            mailbridge_domain::TemplateBody::new("x", data.clone()),
        );

        let body = base.generate_body_string(&mail).await.unwrap();

        assert_eq!(body, "rendered:x");
        assert_eq!(renderer.calls(), vec![("x".to_string(), data)]);
    }

    #[tokio::test]
    async fn test_レンダリング失敗はそのまま返す() {
        let renderer = MockViewRenderer::failing("テンプレートがありません");
        let base = BaseMailAdapter::new(Arc::new(renderer));
        let mail = Mail::new(
            "a@b.com",
            "c@d.com",
            "Hi",
            mailbridge_domain::TemplateBody::new("x", Default::default()),
        );

        let result = base.generate_body_string(&mail).await;

        assert_eq!(
            result,
            Err(MailError::TemplateFailed("テンプレートがありません".to_string()))
        );
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Options {
        region: String,
    }

    #[test]
    fn test_get_optionsで指定した型に変換できる() {
        let adapter: Arc<dyn MailAdapter> =
            Arc::new(MockMailAdapter::with_options(json!({ "region": "ap-northeast-1" })));

        let options: Options = adapter.get_options().unwrap();

        assert_eq!(
            options,
            Options {
                region: "ap-northeast-1".to_string(),
            }
        );
    }

    #[test]
    fn test_get_optionsで型が合わない場合は設定エラーになる() {
        let adapter: Arc<dyn MailAdapter> = Arc::new(MockMailAdapter::with_options(json!({})));

        let result = adapter.get_options::<Options>();

        assert!(matches!(result, Err(MailError::Config(_))));
    }
}
