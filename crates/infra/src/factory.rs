//! # ドライバファクトリ
//!
//! 設定の `driver` キーからドライバを生成するファクトリの一覧。
//! 組み込みの `local` / `smtp` / `http` に加え、アプリケーション独自のキーを登録できる。

use std::{collections::HashMap, sync::Arc};

use mailbridge_domain::{DriverEntry, MailError};
use serde_json::Value;
use strum::{IntoEnumIterator, IntoStaticStr};

use crate::adapter::{
    AdapterContext,
    HttpMailAdapter,
    LocalMailAdapter,
    MailAdapter,
    SmtpMailAdapter,
};

/// ドライバファクトリ
///
/// エントリのオプションと注入する依存からドライバを生成する。
pub type AdapterFactory =
    Arc<dyn Fn(Value, &AdapterContext) -> Result<Arc<dyn MailAdapter>, MailError> + Send + Sync>;

/// 組み込みドライバ
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum BuiltinDriver {
    /// ログ出力のみ（開発用）
    Local,
    /// SMTP（lettre）
    Smtp,
    /// HTTP プロバイダ（reqwest）
    Http,
}

impl BuiltinDriver {
    fn factory(self) -> AdapterFactory {
        match self {
            Self::Local => Arc::new(create_local),
            Self::Smtp => Arc::new(create_smtp),
            Self::Http => Arc::new(create_http),
        }
    }
}

fn create_local(
    options: Value,
    context: &AdapterContext,
) -> Result<Arc<dyn MailAdapter>, MailError> {
    Ok(Arc::new(LocalMailAdapter::new(options, context)))
}

fn create_smtp(
    options: Value,
    context: &AdapterContext,
) -> Result<Arc<dyn MailAdapter>, MailError> {
    Ok(Arc::new(SmtpMailAdapter::new(options, context)?))
}

fn create_http(
    options: Value,
    context: &AdapterContext,
) -> Result<Arc<dyn MailAdapter>, MailError> {
    Ok(Arc::new(HttpMailAdapter::new(options, context)?))
}

/// ドライバファクトリの一覧
#[derive(Clone)]
pub struct AdapterFactories {
    factories: HashMap<String, AdapterFactory>,
}

impl Default for AdapterFactories {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl AdapterFactories {
    /// 空の一覧を生成する
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// 組み込みドライバを登録済みの一覧を生成する
    pub fn with_builtin() -> Self {
        let mut factories = Self::empty();
        for driver in BuiltinDriver::iter() {
            let key: &'static str = driver.into();
            factories.register(key, driver.factory());
        }
        factories
    }

    /// ファクトリを登録する（同じキーは上書き）
    pub fn register(&mut self, key: impl Into<String>, factory: AdapterFactory) {
        self.factories.insert(key.into(), factory);
    }

    /// 登録済みのキー一覧（ソート済み）
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// エントリからドライバを生成する
    ///
    /// 未登録のキーは [`MailError::Config`] を返す。
    pub fn create(
        &self,
        entry: &DriverEntry,
        context: &AdapterContext,
    ) -> Result<Arc<dyn MailAdapter>, MailError> {
        let factory = self.factories.get(&entry.driver).ok_or_else(|| {
            MailError::Config(format!(
                "未知のドライバ種別です: {}（ドライバ名: {}）",
                entry.driver, entry.name
            ))
        })?;
        factory(entry.options.clone(), context)
    }
}
