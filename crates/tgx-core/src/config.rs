use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, relay::RelayConfig, Result};

const DEFAULT_X_API_BASE: &str = "https://api.x.com";
const DEFAULT_FALLBACK_TEXT: &str = "📷";

/// Typed configuration for the relay process.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,
    pub telegram_channels: Vec<String>,
    pub operator_chat_id: Option<i64>,

    // X
    pub x_access_token: String,
    pub x_api_base: String,
    pub http_timeout: Duration,

    // Relay behavior
    pub posting_disabled: bool,
    pub post_min_interval: Duration,
    pub media_fallback_text: String,
}

impl Config {
    /// Load from the process environment (after an optional `.env` in the cwd).
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `load()` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        // Required
        let telegram_bot_token = get("TELEGRAM_BOT_TOKEN").ok_or_else(|| {
            Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;
        let telegram_channels = parse_csv(get("TELEGRAM_CHANNELS"));
        if telegram_channels.is_empty() {
            return Err(Error::Config(
                "TELEGRAM_CHANNELS environment variable is required".to_string(),
            ));
        }
        let x_access_token = get("X_ACCESS_TOKEN").ok_or_else(|| {
            Error::Config("X_ACCESS_TOKEN environment variable is required".to_string())
        })?;

        // Optional
        let operator_chat_id = match get("OPERATOR_CHAT_ID") {
            Some(raw) => Some(raw.trim().parse::<i64>().map_err(|_| {
                Error::Config(format!("OPERATOR_CHAT_ID is not a chat id: {raw}"))
            })?),
            None => None,
        };
        let x_api_base = get("X_API_BASE")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_X_API_BASE.to_string());
        let http_timeout =
            Duration::from_secs(get("HTTP_TIMEOUT_SECS").and_then(parse_u64).unwrap_or(60));

        let posting_disabled = get("X_POSTING_DISABLED").map(parse_bool).unwrap_or(false);
        let post_min_interval = Duration::from_secs(
            get("POST_MIN_INTERVAL_SECS")
                .and_then(parse_u64)
                .unwrap_or(300),
        );
        let media_fallback_text =
            get("MEDIA_FALLBACK_TEXT").unwrap_or_else(|| DEFAULT_FALLBACK_TEXT.to_string());

        Ok(Self {
            telegram_bot_token,
            telegram_channels,
            operator_chat_id,
            x_access_token,
            x_api_base,
            http_timeout,
            posting_disabled,
            post_min_interval,
            media_fallback_text,
        })
    }

    /// The subset of configuration consumed by the relay engine.
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            min_interval: self.post_min_interval,
            monitored_channels: self.telegram_channels.iter().cloned().collect(),
            posting_disabled: self.posting_disabled,
            fallback_text: self.media_fallback_text.clone(),
        }
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        env::set_var(key, strip_quotes(v.trim()));
    }
}

fn strip_quotes(val: &str) -> &str {
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        &val[1..val.len() - 1]
    } else {
        val
    }
}

fn parse_bool(s: String) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_u64(s: String) -> Option<u64> {
    s.trim().parse::<u64>().ok()
}

fn parse_csv(v: Option<String>) -> Vec<String> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
