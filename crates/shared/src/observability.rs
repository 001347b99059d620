//! # トレーシング初期化
//!
//! CLI 向けの tracing subscriber 設定。ログは stderr に出力し、stdout は使わない。
//!
//! | 変数名 | 説明 |
//! |--------|------|
//! | `LOG_FORMAT` | `json` / `pretty`（大文字小文字は区別しない、デフォルト: `pretty`） |
//! | `RUST_LOG` | フィルタ（デフォルト: [`DEFAULT_FILTER`]） |

use std::str::FromStr;

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "info,mailbridge=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 JSON（`jq` で調査する環境向け）
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(s.to_string()),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub log_format:      LogFormat,
    /// `EnvFilter` のディレクティブ
    pub filter:          String,
    /// 解釈できなかった `LOG_FORMAT` の値（初期化後に警告する）
    pub rejected_format: Option<String>,
}

impl TracingConfig {
    /// 環境変数から設定を読み取る
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// キーから値を引く関数で設定を読み取る
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let (log_format, rejected_format) = match lookup("LOG_FORMAT") {
            None => (LogFormat::default(), None),
            Some(value) => match value.parse() {
                Ok(format) => (format, None),
                Err(rejected) => (LogFormat::default(), Some(rejected)),
            },
        };

        Self {
            log_format,
            filter: lookup("RUST_LOG")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
            rejected_format,
        }
    }
}

/// グローバルな tracing subscriber を設定する
///
/// フィルタが解釈できない場合は [`DEFAULT_FILTER`] を使う。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter);

    match config.log_format {
        LogFormat::Json => builder.json().flatten_event(true).init(),
        LogFormat::Pretty => builder.init(),
    }

    if let Some(rejected) = &config.rejected_format {
        tracing::warn!(log_format = %rejected, "未知の LOG_FORMAT のため pretty で出力します");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> TracingConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        TracingConfig::from_lookup(|key: &str| vars.get(key).cloned())
    }

    #[test]
    fn test_log_formatは大文字小文字を区別しない() {
        assert_eq!("json".parse(), Ok(LogFormat::Json));
        assert_eq!("JSON".parse(), Ok(LogFormat::Json));
        assert_eq!("Pretty".parse(), Ok(LogFormat::Pretty));
        assert_eq!("xml".parse::<LogFormat>(), Err("xml".to_string()));
    }

    #[test]
    fn test_環境変数がない場合はprettyと既定のフィルタを使う() {
        let config = config_from(&[]);

        assert_eq!(
            config,
            TracingConfig {
                log_format:      LogFormat::Pretty,
                filter:          DEFAULT_FILTER.to_string(),
                rejected_format: None,
            }
        );
    }

    #[test]
    fn test_不正なlog_formatはprettyにして値を保持する() {
        let config = config_from(&[("LOG_FORMAT", "xml")]);

        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.rejected_format.as_deref(), Some("xml"));
    }

    #[test]
    fn test_rust_logを指定するとフィルタに使う() {
        let config = config_from(&[("LOG_FORMAT", "json"), ("RUST_LOG", "warn")]);

        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.filter, "warn");
    }

    #[test]
    fn test_空のrust_logは既定のフィルタにする() {
        let config = config_from(&[("RUST_LOG", "  ")]);

        assert_eq!(config.filter, DEFAULT_FILTER);
    }
}
