//! # テンプレートレンダラー
//!
//! テンプレート本文を文字列に変換する外部依存を抽象化する。
//! 本番実装 [`TeraViewRenderer`] は tera テンプレートエンジンを使う。

use async_trait::async_trait;
use mailbridge_domain::{MailError, TemplateData};
use serde_json::Value;
use tera::{Context, Tera};

/// テンプレートレンダラートレイト
#[async_trait]
pub trait ViewRenderer: Send + Sync {
    /// テンプレートをデータでレンダリングする
    async fn render(&self, view: &str, data: &TemplateData) -> Result<String, MailError>;
}

/// tera によるレンダラー
///
/// `view` はテンプレート名と完全一致で探し、見つからなければ `{view}.html` を探す。
pub struct TeraViewRenderer {
    engine: Tera,
}

impl TeraViewRenderer {
    /// glob にマッチするテンプレートファイルを読み込む
    ///
    /// テンプレート名は glob のディレクトリ部分からの相対パスになる
    /// （例: `templates/**/*` の `templates/welcome.html` → `welcome.html`）。
    pub fn from_glob(glob: &str) -> Result<Self, MailError> {
        let engine = Tera::new(glob)
            .map_err(|e| MailError::TemplateFailed(format!("テンプレート読み込み失敗: {e}")))?;
        Ok(Self { engine })
    }

    /// 名前とソースの組からテンプレートを登録する
    pub fn from_raw_templates(templates: Vec<(&str, &str)>) -> Result<Self, MailError> {
        let mut engine = Tera::default();
        engine
            .add_raw_templates(templates)
            .map_err(|e| MailError::TemplateFailed(format!("テンプレート登録失敗: {e}")))?;
        Ok(Self { engine })
    }

    /// 登録済みテンプレート名の一覧（ソート済み）
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.engine.get_template_names().collect();
        names.sort_unstable();
        names
    }

    fn resolve_name(&self, view: &str) -> String {
        if self.engine.get_template_names().any(|name| name == view) {
            view.to_string()
        } else {
            format!("{view}.html")
        }
    }
}

#[async_trait]
impl ViewRenderer for TeraViewRenderer {
    async fn render(&self, view: &str, data: &TemplateData) -> Result<String, MailError> {
        let context = Context::from_value(Value::Object(data.clone()))
            .map_err(|e| MailError::TemplateFailed(format!("{view}: {e}")))?;

        self.engine
            .render(&self.resolve_name(view), &context)
            .map_err(|e| MailError::TemplateFailed(format!("{view}: {e}")))
    }
}
