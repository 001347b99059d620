//! # Mailer
//!
//! 標準入力から JSON のメールを読み込み、設定したドライバで送信する。
//!
//! ## 起動方法
//!
//! ```bash
//! # デフォルトドライバ（未設定なら local）で送信
//! echo '{"to":"a@b.com","from":"c@d.com","subject":"Hi","body":"Hello"}' | cargo run -p mailbridge-mailer
//!
//! # ドライバ名を指定して送信
//! SMTP_HOST=localhost cargo run -p mailbridge-mailer -- smtp < mail.json
//! ```
//!
//! 環境変数は [`mailbridge_mailer::config`] を参照。

use std::sync::Arc;

use anyhow::Context as _;
use mailbridge_domain::Mail;
use mailbridge_infra::{TeraViewRenderer, TracingMailLogger};
use mailbridge_mailer::{MailService, MailerConfig};
use mailbridge_shared::observability::{TracingConfig, init_tracing};
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(&TracingConfig::from_env());

    let config = MailerConfig::from_env().context("設定の読み込みに失敗しました")?;
    let locales = config.load_locales()?;
    let renderer = TeraViewRenderer::from_glob(&config.template_glob)?;
    tracing::debug!(templates = ?renderer.template_names(), "テンプレートを読み込みました");

    let mut service = MailService::new(
        config.mail,
        locales,
        Arc::new(TracingMailLogger),
        Arc::new(renderer),
    );
    service.boot()?;
    tracing::info!(
        drivers = ?service.registered_names(),
        default = service.default_driver_name(),
        "メールサービスを起動しました"
    );

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("標準入力の読み込みに失敗しました")?;
    let mail: Mail = serde_json::from_str(&input).context("メールの JSON が不正です")?;

    let driver = std::env::args().nth(1);
    service.send(mail, driver.as_deref()).await?;

    Ok(())
}
