//! # ドライバ登録設定
//!
//! 起動時に `MailService` が読み込むドライバ一覧とデフォルトドライバ名。
//!
//! ```json
//! {
//!   "default": "local",
//!   "drivers": [
//!     { "name": "local", "driver": "local" },
//!     { "name": "smtp", "driver": "smtp", "options": { "host": "localhost", "port": 1025 } }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MailError;

/// ドライバ登録エントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverEntry {
    /// 登録名（設定内で一意）
    pub name:    String,
    /// ドライバファクトリのキー（"local" | "smtp" | "http" | アプリ独自のキー）
    pub driver:  String,
    /// ドライバ生成時に渡すオプション
    #[serde(default = "empty_options")]
    pub options: Value,
}

fn empty_options() -> Value {
    Value::Object(Map::new())
}

impl DriverEntry {
    pub fn new(name: impl Into<String>, driver: impl Into<String>, options: Value) -> Self {
        Self {
            name: name.into(),
            driver: driver.into(),
            options,
        }
    }
}

/// メール設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailConfig {
    /// デフォルトドライバ名（登録済みのエントリ名と一致すること）
    #[serde(rename = "default")]
    pub default_driver: String,
    /// ドライバ登録エントリ（順序を保持）
    #[serde(default)]
    pub drivers:        Vec<DriverEntry>,
}

impl MailConfig {
    pub fn new(default_driver: impl Into<String>) -> Self {
        Self {
            default_driver: default_driver.into(),
            drivers:        Vec::new(),
        }
    }

    pub fn with_driver(mut self, entry: DriverEntry) -> Self {
        self.drivers.push(entry);
        self
    }

    /// JSON 文字列から読み込む
    pub fn from_json_str(json: &str) -> Result<Self, MailError> {
        serde_json::from_str(json)
            .map_err(|e| MailError::Config(format!("メール設定の解析に失敗: {e}")))
    }

    /// JSON ファイルから読み込む
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MailError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            MailError::Config(format!(
                "メール設定の読み込みに失敗: {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&json)
    }

    /// 名前でエントリを検索する（重複時は最初のエントリ）
    pub fn find_entry(&self, name: &str) -> Option<&DriverEntry> {
        self.drivers.iter().find(|entry| entry.name == name)
    }
}
