use thiserror::Error;

/// Seconds a tool may run before it is considered long-running.
pub const DEFAULT_LONG_RUNNING_THRESHOLD: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),
}

/// Runtime configuration, read from the environment.
///
/// Construction never fails: missing credentials are kept as empty
/// strings so hook-side state bookkeeping can proceed regardless.
/// Call [`Config::validate`] before actually talking to Telegram.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub chat_id: String,
    pub notify_on_error: bool,
    pub notify_on_complete: bool,
    pub notify_on_long_running: bool,
    pub long_running_threshold_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            bot_token: std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            chat_id: std::env::var("TELEGRAM_CHAT_ID").unwrap_or_default(),
            notify_on_error: env_bool("NOTIFY_ON_ERROR"),
            notify_on_complete: env_bool("NOTIFY_ON_COMPLETE"),
            notify_on_long_running: env_bool("NOTIFY_ON_LONG_RUNNING"),
            long_running_threshold_secs: std::env::var("LONG_RUNNING_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LONG_RUNNING_THRESHOLD),
        }
    }

    /// Check that the Telegram credentials are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.is_empty() {
            return Err(ConfigError::MissingVar("TELEGRAM_BOT_TOKEN"));
        }
        if self.chat_id.is_empty() {
            return Err(ConfigError::MissingVar("TELEGRAM_CHAT_ID"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bot_token: String::new(),
            chat_id: String::new(),
            notify_on_error: true,
            notify_on_complete: true,
            notify_on_long_running: true,
            long_running_threshold_secs: DEFAULT_LONG_RUNNING_THRESHOLD,
        }
    }
}

/// Boolean toggle semantics: unset means enabled, anything other
/// than "true" (case-insensitive) means disabled.
fn env_bool(name: &str) -> bool {
    match std::env::var(name) {
        Ok(v) => v.eq_ignore_ascii_case("true"),
        Err(_) => true,
    }
}
