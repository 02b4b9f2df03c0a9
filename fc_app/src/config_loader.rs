use std::path::Path;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use config::File;
use config::FileFormat;
use fc_calc::CalculatorConfig;
use serde::Deserialize;

/// Default location of the optional bot config file
pub const DEFAULT_CONFIG_PATH: &str = "config/bot.toml";

/// Environment variable holding the bot token
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BotConfigFile {
    /// Seconds between liveness log lines
    pub keep_alive_interval_secs: u64,

    pub log_dir: String,

    /// Mirror log lines to stdout in addition to the rolling file
    pub log_to_stdout: bool,

    /// Skip updates that queued up while the bot was offline
    pub drop_pending_updates: bool,

    /// Quick-pick buttons offered at the pair step
    pub popular_pairs: Vec<String>,

    pub calculator: CalculatorConfig,
}

impl Default for BotConfigFile {
    fn default() -> Self {
        Self {
            keep_alive_interval_secs: 3600, // 1 hour
            log_dir: "./logs".to_string(),
            log_to_stdout: true,
            drop_pending_updates: true,
            popular_pairs: vec!["BTCUSDT".to_string(), "ETHUSDT".to_string(), "SOLUSDT".to_string()],
            calculator: CalculatorConfig::default(),
        }
    }
}

impl BotConfigFile {
    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_secs(self.keep_alive_interval_secs.max(1))
    }
}

pub fn load_bot_config<P: AsRef<Path>>(path: P) -> Result<BotConfigFile, ConfigError> {
    let config = Config::builder().add_source(File::from(path.as_ref())).build()?;

    config.try_deserialize()
}

pub fn load_bot_config_from_str(toml: &str) -> Result<BotConfigFile, ConfigError> {
    let config = Config::builder().add_source(File::from_str(toml, FileFormat::Toml)).build()?;

    config.try_deserialize()
}

/// Read the bot token through `lookup`; blank values count as missing
pub fn resolve_token<F>(lookup: F) -> Option<String>
where
    F: FnOnce(&str) -> Option<String>,
{
    lookup(TOKEN_ENV_VAR).map(|token| token.trim().to_string()).filter(|token| !token.is_empty())
}

/// Read the bot token from the process environment
pub fn token_from_env() -> Option<String> {
    resolve_token(|key| std::env::var(key).ok())
}
