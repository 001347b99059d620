//! # ロケールコンテキスト
//!
//! プロセス全体で共有する読み取り専用のロケール設定。
//! テンプレート本文の送信時に `locales` キーとしてコピーが注入される。

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MailError;

/// ロケールコンテキスト
///
/// JSON オブジェクトをそのまま保持する。キーの意味は解釈しない。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleContext(Map<String, Value>);

impl LocaleContext {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    /// JSON 文字列から読み込む
    ///
    /// ルートが JSON オブジェクトでない場合は [`MailError::Config`] を返す。
    pub fn from_json_str(json: &str) -> Result<Self, MailError> {
        serde_json::from_str(json)
            .map_err(|e| MailError::Config(format!("ロケール設定の解析に失敗: {e}")))
    }

    /// JSON ファイルから読み込む
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MailError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            MailError::Config(format!(
                "ロケール設定の読み込みに失敗: {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}
