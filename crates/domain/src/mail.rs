//! # メール
//!
//! 1 回の送信で使い捨てるメールの値オブジェクト。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`Mail`] | メール | 宛先、送信元、件名、本文、添付ファイル、送信オプション |
//! | [`Recipients`] | 宛先 | 単一アドレスまたは順序付きリスト |
//! | [`MailBody`] | 本文 | 文字列、またはテンプレート参照 + データ |
//! | [`Attachment`] | 添付ファイル | 名前 + 内容 + Content-Type（任意） |
//!
//! ## 設計方針
//!
//! - **検証しない**: 空の宛先や存在しないテンプレートも受け付け、送信・レンダリング時に失敗させる
//! - **テンプレートデータは常にマップ**: `data` 省略時は空のマップとして扱う

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::locale::LocaleContext;

/// テンプレートに渡すデータ
pub type TemplateData = Map<String, Value>;

/// 送信ごとの自由形式オプション
///
/// ドライバごとに解釈が異なる（SMTP は `cc` / `bcc` / `reply_to`、HTTP はペイロードに展開）。
pub type MailOptions = Map<String, Value>;

/// テンプレート本文に注入するロケール情報のキー
pub const LOCALES_KEY: &str = "locales";

/// ロケール情報内の送信日時のキー
pub const LOCALE_DATE_KEY: &str = "date";

/// 宛先
///
/// JSON では文字列または文字列の配列として表現される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    /// 単一アドレス
    One(String),
    /// 複数アドレス（順序を保持）
    Many(Vec<String>),
}

impl Recipients {
    /// 宛先アドレスを順に返す
    pub fn addresses(&self) -> Vec<&str> {
        match self {
            Self::One(address) => vec![address.as_str()],
            Self::Many(addresses) => addresses.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(address) => address.is_empty(),
            Self::Many(addresses) => addresses.is_empty(),
        }
    }
}

impl From<&str> for Recipients {
    fn from(address: &str) -> Self {
        Self::One(address.to_string())
    }
}

impl From<String> for Recipients {
    fn from(address: String) -> Self {
        Self::One(address)
    }
}

impl From<Vec<String>> for Recipients {
    fn from(addresses: Vec<String>) -> Self {
        Self::Many(addresses)
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(addresses: Vec<&str>) -> Self {
        Self::Many(addresses.into_iter().map(str::to_string).collect())
    }
}

/// テンプレート本文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateBody {
    /// テンプレート名（ビュー参照）
    pub view: String,
    /// テンプレートに渡すデータ
    #[serde(default)]
    pub data: TemplateData,
}

impl TemplateBody {
    pub fn new(view: impl Into<String>, data: TemplateData) -> Self {
        Self {
            view: view.into(),
            data,
        }
    }

    /// ロケール情報と送信日時を `locales` キーにマージする
    ///
    /// 浅いマージ。`locales` 以外の既存キーは変更しない。
    /// ロケールコンテキストはコピーされるため、呼び出し元の値は変化しない。
    pub fn merge_locales(&mut self, locales: &LocaleContext, now: &str) {
        let mut snapshot = locales.as_map().clone();
        snapshot.insert(LOCALE_DATE_KEY.to_string(), Value::String(now.to_string()));
        self.data
            .insert(LOCALES_KEY.to_string(), Value::Object(snapshot));
    }
}

/// 本文
///
/// JSON では文字列、または `{ "view": ..., "data": {...} }` として表現される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MailBody {
    /// 文字列本文（そのまま送信する）
    Text(String),
    /// テンプレート本文（送信時にレンダリングする）
    Template(TemplateBody),
}

impl MailBody {
    /// テンプレート本文の場合に参照を返す
    pub fn as_template(&self) -> Option<&TemplateBody> {
        match self {
            Self::Template(template) => Some(template),
            Self::Text(_) => None,
        }
    }

    pub fn as_template_mut(&mut self) -> Option<&mut TemplateBody> {
        match self {
            Self::Template(template) => Some(template),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for MailBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MailBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<TemplateBody> for MailBody {
    fn from(template: TemplateBody) -> Self {
        Self::Template(template)
    }
}

/// 添付ファイル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// ファイル名
    pub name:         String,
    /// 内容
    pub content:      Vec<u8>,
    /// Content-Type（省略時はトランスポートの既定値）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name:         name.into(),
            content:      content.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// メール
///
/// 送信ごとに生成し、送信後は破棄する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mail {
    to:          Recipients,
    from:        String,
    subject:     String,
    body:        MailBody,
    #[serde(default)]
    attachments: Vec<Attachment>,
    #[serde(default)]
    options:     MailOptions,
}

impl Mail {
    /// 新しいメールを作成する
    ///
    /// ```
    /// use mailbridge_domain::Mail;
    ///
    /// let mail = Mail::new("a@b.com", "c@d.com", "Hi", "Hello");
    /// assert_eq!(mail.subject(), "Hi");
    /// ```
    pub fn new(
        to: impl Into<Recipients>,
        from: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<MailBody>,
    ) -> Self {
        Self {
            to:          to.into(),
            from:        from.into(),
            subject:     subject.into(),
            body:        body.into(),
            attachments: Vec::new(),
            options:     MailOptions::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    // ===== ゲッター =====

    pub fn to(&self) -> &Recipients {
        &self.to
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &MailBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut MailBody {
        &mut self.body
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn options(&self) -> &MailOptions {
        &self.options
    }

    /// 文字列のオプション値を返す
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }

    // ===== セッター =====

    pub fn set_to(&mut self, to: impl Into<Recipients>) {
        self.to = to.into();
    }

    pub fn set_from(&mut self, from: impl Into<String>) {
        self.from = from.into();
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn set_body(&mut self, body: impl Into<MailBody>) {
        self.body = body.into();
    }

    pub fn set_attachments(&mut self, attachments: Vec<Attachment>) {
        self.attachments = attachments;
    }

    pub fn set_options(&mut self, options: MailOptions) {
        self.options = options;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_文字列本文のjsonをデシリアライズできる() {
        let mail: Mail = serde_json::from_value(json!({
            "to": "a@b.com",
            "from": "c@d.com",
            "subject": "Hi",
            "body": "Hello"
        }))
        .unwrap();

        assert_eq!(mail.to(), &Recipients::One("a@b.com".to_string()));
        assert_eq!(mail.body(), &MailBody::Text("Hello".to_string()));
        assert!(mail.attachments().is_empty());
        assert!(mail.options().is_empty());
    }

    #[test]
    fn test_テンプレート本文のjsonをデシリアライズできる() {
        let mail: Mail = serde_json::from_value(json!({
            "to": ["a@b.com", "e@f.com"],
            "from": "c@d.com",
            "subject": "Hi",
            "body": { "view": "welcome", "data": { "name": "太郎" } }
        }))
        .unwrap();

        let template = mail.body().as_template().unwrap();
        assert_eq!(template.view, "welcome");
        assert_eq!(template.data["name"], json!("太郎"));
        assert_eq!(mail.to().addresses(), vec!["a@b.com", "e@f.com"]);
    }

    #[test]
    fn test_dataを省略したテンプレート本文は空のマップになる() {
        let body: MailBody = serde_json::from_value(json!({ "view": "welcome" })).unwrap();

        let template = body.as_template().unwrap();
        assert!(template.data.is_empty());
    }

    #[test]
    fn test_空の宛先も受け付ける() {
        let mail = Mail::new(Vec::<String>::new(), "c@d.com", "Hi", "Hello");

        assert!(mail.to().is_empty());
    }

    #[test]
    fn test_セッターで各フィールドを変更できる() {
        let mut mail = Mail::new("a@b.com", "c@d.com", "Hi", "Hello");

        mail.set_to(vec!["x@y.com", "z@w.com"]);
        mail.set_from("noreply@example.com");
        mail.set_subject("Bye");
        mail.set_body(TemplateBody::new("farewell", TemplateData::new()));
        mail.set_attachments(vec![Attachment::new("a.txt", "abc")]);

        assert_eq!(mail.to().addresses(), vec!["x@y.com", "z@w.com"]);
        assert_eq!(mail.from(), "noreply@example.com");
        assert_eq!(mail.subject(), "Bye");
        assert_eq!(mail.body().as_template().unwrap().view, "farewell");
        assert_eq!(mail.attachments()[0].content, b"abc".to_vec());
    }

    #[test]
    fn test_option_strは文字列以外のオプションを無視する() {
        let mail = Mail::new("a@b.com", "c@d.com", "Hi", "Hello")
            .with_option("reply_to", "r@example.com")
            .with_option("priority", 1);

        assert_eq!(mail.option_str("reply_to"), Some("r@example.com"));
        assert_eq!(mail.option_str("priority"), None);
        assert_eq!(mail.option_str("missing"), None);
    }

    #[test]
    fn test_merge_localesは既存データを残してlocalesキーを追加する() {
        let mut data = TemplateData::new();
        data.insert("a".to_string(), json!(1));
        let mut template = TemplateBody::new("x", data);
        let locales =
            LocaleContext::from_json_str(r#"{ "lang": "ja", "timezone": "Asia/Tokyo" }"#).unwrap();

        template.merge_locales(&locales, "2026-10-18T00:00:00+00:00");

        assert_eq!(template.data["a"], json!(1));
        assert_eq!(
            template.data[LOCALES_KEY],
            json!({
                "lang": "ja",
                "timezone": "Asia/Tokyo",
                "date": "2026-10-18T00:00:00+00:00"
            })
        );
        assert!(locales.as_map().get(LOCALE_DATE_KEY).is_none());
    }

    #[test]
    fn test_merge_localesは既存のlocalesキーを上書きする() {
        let mut data = TemplateData::new();
        data.insert(LOCALES_KEY.to_string(), json!("user supplied"));
        let mut template = TemplateBody::new("x", data);

        template.merge_locales(&LocaleContext::default(), "now");

        assert_eq!(template.data[LOCALES_KEY], json!({ "date": "now" }));
    }

    #[test]
    fn test_添付ファイルのcontent_typeを設定できる() {
        let attachment = Attachment::new("report.csv", "a,b").with_content_type("text/csv");

        assert_eq!(attachment.content_type.as_deref(), Some("text/csv"));
    }
}
