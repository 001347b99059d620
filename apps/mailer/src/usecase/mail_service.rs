//! # メール送信サービス
//!
//! 名前付きドライバのレジストリと、ドライバを選んでメールを渡すだけの送信処理。
//!
//! ## 設計方針
//!
//! - **起動時に 1 度だけ登録**: `boot()` で設定のエントリからドライバを生成し、以後は読み取りのみ
//! - **重複は無視**: 同じ名前のエントリは最初の 1 つだけ登録する（上書きしない）
//! - **ロケール注入**: テンプレート本文には送信ごとにロケール情報と送信日時のコピーを注入する
//! - **失敗は握りつぶさない**: ロガーに 1 度だけ出力し、同じエラーを呼び出し元に返す

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use mailbridge_domain::{LocaleContext, Mail, MailConfig, MailError};
use mailbridge_infra::{
    AdapterContext,
    AdapterFactories,
    AdapterFactory,
    MailAdapter,
    MailLogger,
    ViewRenderer,
};
use mailbridge_shared::{event_log::event, log_business_event};

/// メール送信サービス
pub struct MailService {
    config:    MailConfig,
    locales:   LocaleContext,
    context:   AdapterContext,
    factories: AdapterFactories,
    drivers:   HashMap<String, Arc<dyn MailAdapter>>,
    booted:    bool,
}

impl MailService {
    /// 新しいサービスを作成する
    ///
    /// 組み込みドライバ（`local` / `smtp` / `http`）のファクトリを持つ。
    /// ドライバは [`boot()`](Self::boot) を呼ぶまで登録されない。
    pub fn new(
        config: MailConfig,
        locales: LocaleContext,
        logger: Arc<dyn MailLogger>,
        renderer: Arc<dyn ViewRenderer>,
    ) -> Self {
        Self {
            config,
            locales,
            context: AdapterContext::new(logger, renderer),
            factories: AdapterFactories::with_builtin(),
            drivers: HashMap::new(),
            booted: false,
        }
    }

    /// 独自のドライバファクトリを追加する
    ///
    /// 設定エントリの `driver` に `key` を指定すると、このファクトリでドライバを生成する。
    pub fn with_factory(mut self, key: impl Into<String>, factory: AdapterFactory) -> Self {
        self.factories.register(key, factory);
        self
    }

    /// 設定のエントリからドライバを生成して登録する
    ///
    /// 登録済みの名前はスキップするため、2 回呼んでもドライバは名前ごとに 1 つだけになる。
    /// 未知のドライバ種別やオプション不正は [`MailError::Config`] を返す。
    pub fn boot(&mut self) -> Result<(), MailError> {
        for entry in &self.config.drivers {
            if self.drivers.contains_key(&entry.name) {
                tracing::debug!(mail.driver = %entry.name, "登録済みのドライバをスキップ");
                continue;
            }

            let adapter = self.factories.create(entry, &self.context)?;
            self.drivers.insert(entry.name.clone(), adapter);

            log_business_event!(
                event.category = event::category::MAIL,
                event.action = event::action::DRIVER_REGISTERED,
                event.result = event::result::SUCCESS,
                mail.driver = %entry.name,
                mail.driver_kind = %entry.driver,
                "メールドライバを登録"
            );
        }

        if self.config.find_entry(&self.config.default_driver).is_none() {
            tracing::warn!(
                mail.driver = %self.config.default_driver,
                "デフォルトドライバが設定に存在しません"
            );
        }

        self.booted = true;
        Ok(())
    }

    pub fn is_booted(&self) -> bool {
        self.booted
    }

    /// メールを送信する
    ///
    /// `driver` を省略した場合はデフォルトドライバを使う。
    /// 失敗時はロガーのエラー出力を 1 度呼び、同じエラーを返す。
    pub async fn send(&self, mail: Mail, driver: Option<&str>) -> Result<(), MailError> {
        let driver_name = driver.unwrap_or(&self.config.default_driver);

        match self.dispatch(mail, driver_name).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::MAIL,
                    event.action = event::action::MAIL_SENT,
                    event.result = event::result::SUCCESS,
                    mail.driver = %driver_name,
                    "メール送信成功"
                );
                Ok(())
            }
            Err(e) => {
                self.context.logger.error(&e);
                log_business_event!(
                    event.category = event::category::MAIL,
                    event.action = event::action::MAIL_FAILED,
                    event.result = event::result::FAILURE,
                    mail.driver = %driver_name,
                    error.kind = e.kind(),
                    "メール送信失敗"
                );
                Err(e)
            }
        }
    }

    async fn dispatch(&self, mut mail: Mail, driver_name: &str) -> Result<(), MailError> {
        if let Some(template) = mail.body_mut().as_template_mut() {
            template.merge_locales(&self.locales, &Utc::now().to_rfc3339());
        }

        let adapter = self.get_driver(driver_name)?;
        adapter.send(&mail).await
    }

    /// 名前でドライバを取得する
    pub fn get_driver(&self, name: &str) -> Result<Arc<dyn MailAdapter>, MailError> {
        self.drivers
            .get(name)
            .cloned()
            .ok_or_else(|| MailError::UnknownDriver(name.to_string()))
    }

    /// デフォルトドライバを取得する
    pub fn get_default_driver(&self) -> Result<Arc<dyn MailAdapter>, MailError> {
        self.get_driver(&self.config.default_driver)
    }

    pub fn default_driver_name(&self) -> &str {
        &self.config.default_driver
    }

    /// 登録済みドライバ名の一覧（ソート済み）
    pub fn registered_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.drivers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
