//! MailService 統合テスト
//!
//! 同梱テンプレート（`templates/`）と tera レンダラーを使い、
//! 設定ファイルの読み込みから local ドライバでの送信までを検証する。
//!
//! 実行方法:
//! ```bash
//! cargo test -p mailbridge-mailer --test mail_service_test
//! ```

use std::{io::Write, sync::Arc};

use mailbridge_domain::{LocaleContext, Mail, MailConfig, MailError, TemplateBody, TemplateData};
use mailbridge_infra::{TeraViewRenderer, mock::RecordingMailLogger};
use mailbridge_mailer::{MailService, MailerConfig};
use pretty_assertions::assert_eq;
use serde_json::json;

fn template_glob() -> String {
    format!("{}/templates/**/*", env!("CARGO_MANIFEST_DIR"))
}

fn make_service(logger: &RecordingMailLogger, locales: LocaleContext) -> MailService {
    let config = MailConfig::from_json_str(
        r#"{
            "default": "local",
            "drivers": [
                { "name": "local", "driver": "local", "options": {} },
                { "name": "mailpit", "driver": "smtp", "options": { "host": "localhost", "port": 1025 } }
            ]
        }"#,
    )
    .unwrap();
    let renderer = TeraViewRenderer::from_glob(&template_glob()).unwrap();

    let mut service = MailService::new(config, locales, Arc::new(logger.clone()), Arc::new(renderer));
    service.boot().unwrap();
    service
}

#[tokio::test]
async fn test_文字列本文のメールをlocalドライバで送信できる() {
    let logger = RecordingMailLogger::new();
    let service = make_service(&logger, LocaleContext::default());

    service
        .send(Mail::new("a@b.com", "c@d.com", "Hi", "Hello"), None)
        .await
        .unwrap();

    let infos = logger.infos();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].1["to"], json!("a@b.com"));
    assert_eq!(infos[0].1["subject"], json!("Hi"));
    assert_eq!(infos[0].1["body"], json!("Hello"));
}

#[tokio::test]
async fn test_テンプレート本文にロケール情報がレンダリングされる() {
    let logger = RecordingMailLogger::new();
    let locales = LocaleContext::from_json_str(r#"{ "lang": "ja" }"#).unwrap();
    let service = make_service(&logger, locales);
    let mut data = TemplateData::new();
    data.insert("name".to_string(), json!("田中"));

    service
        .send(
            Mail::new("a@b.com", "c@d.com", "ようこそ", TemplateBody::new("welcome", data)),
            None,
        )
        .await
        .unwrap();

    let body = infos_body(&logger);
    assert!(body.contains("田中 さん、ようこそ。"), "{body}");
    assert!(body.contains("言語: ja"), "{body}");
    assert!(body.contains("送信日時: 20"), "{body}");
}

#[tokio::test]
async fn test_テキストテンプレートも拡張子付きの名前で解決できる() {
    let logger = RecordingMailLogger::new();
    let service = make_service(&logger, LocaleContext::default());
    let mut data = TemplateData::new();
    data.insert("name".to_string(), json!("鈴木"));
    data.insert(
        "reset_url".to_string(),
        json!("https://example.com/reset?token=abc"),
    );

    service
        .send(
            Mail::new(
                "a@b.com",
                "c@d.com",
                "パスワード再設定",
                TemplateBody::new("password_reset.txt", data),
            ),
            None,
        )
        .await
        .unwrap();

    let body = infos_body(&logger);
    assert!(body.contains("鈴木 さん"), "{body}");
    assert!(body.contains("https://example.com/reset?token=abc"), "{body}");
}

#[tokio::test]
async fn test_存在しないテンプレートは送信失敗になりエラーを1回ログ出力する() {
    let logger = RecordingMailLogger::new();
    let service = make_service(&logger, LocaleContext::default());

    let result = service
        .send(
            Mail::new(
                "a@b.com",
                "c@d.com",
                "Hi",
                TemplateBody::new("no_such_template", TemplateData::new()),
            ),
            None,
        )
        .await;

    assert!(matches!(result, Err(MailError::TemplateFailed(_))));
    assert_eq!(logger.errors().len(), 1);
    assert!(logger.infos().is_empty());
}

#[test]
fn test_設定ファイルのドライバがすべて登録される() {
    let logger = RecordingMailLogger::new();
    let service = make_service(&logger, LocaleContext::default());

    assert_eq!(service.registered_names(), vec!["local", "mailpit"]);
    assert_eq!(
        service.get_driver("mailpit").unwrap().options(),
        &json!({ "host": "localhost", "port": 1025 })
    );
}

#[tokio::test]
async fn test_環境変数の設定からサービスを起動できる() {
    let mut locales_file = tempfile::NamedTempFile::new().unwrap();
    write!(locales_file, r#"{{ "lang": "en" }}"#).unwrap();
    let locales_path = locales_file.path().to_str().unwrap().to_string();
    let template_dir = format!("{}/templates", env!("CARGO_MANIFEST_DIR"));

    let config = MailerConfig::from_lookup(|key| match key {
        "MAIL_TEMPLATE_DIR" => Some(template_dir.clone()),
        "MAIL_LOCALES_PATH" => Some(locales_path.clone()),
        _ => None,
    })
    .unwrap();
    let logger = RecordingMailLogger::new();
    let renderer = TeraViewRenderer::from_glob(&config.template_glob).unwrap();
    let mut service = MailService::new(
        config.mail.clone(),
        config.load_locales().unwrap(),
        Arc::new(logger.clone()),
        Arc::new(renderer),
    );
    service.boot().unwrap();
    let mut data = TemplateData::new();
    data.insert("name".to_string(), json!("Alice"));

    service
        .send(
            Mail::new("a@b.com", "c@d.com", "Welcome", TemplateBody::new("welcome", data)),
            None,
        )
        .await
        .unwrap();

    assert_eq!(service.registered_names(), vec!["local"]);
    assert!(infos_body(&logger).contains("言語: en"));
}

fn infos_body(logger: &RecordingMailLogger) -> String {
    let infos = logger.infos();
    assert_eq!(infos.len(), 1);
    infos[0].1["body"].as_str().unwrap().to_string()
}
