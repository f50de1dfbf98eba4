use std::net::IpAddr;
use std::path::PathBuf;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub environment: Environment,
    pub telegram: Option<TelegramConfig>,
    pub cors_origin: String,
    pub data_file: PathBuf,
    pub redirect_path: String,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("FORMRELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_HOST: {e}"))?;

        let port_raw = env_opt("FORMRELAY_PORT")
            .or_else(|| env_opt("PORT"))
            .unwrap_or_else(|| "3000".to_string());
        let port: u16 = port_raw
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_PORT: {e}"))?;

        let environment = match env_or("FORMRELAY_ENV", "production").as_str() {
            "development" => Environment::Development,
            _ => Environment::Production,
        };

        let api_base = env_or("TELEGRAM_API_BASE", DEFAULT_TELEGRAM_API);
        let telegram = telegram_from_parts(
            env_opt("TELEGRAM_BOT_TOKEN"),
            env_opt("TELEGRAM_CHAT_ID"),
            api_base,
        )?;

        let max_body_size: usize = env_or("FORMRELAY_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("FORMRELAY_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid FORMRELAY_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Config {
            host,
            port,
            environment,
            telegram,
            cors_origin: env_or("FORMRELAY_CORS_ORIGIN", "*"),
            data_file: PathBuf::from(env_or("FORMRELAY_DATA_FILE", "data/submissions.json")),
            redirect_path: env_or("FORMRELAY_REDIRECT_PATH", "/otp.html"),
            max_body_size,
            trusted_proxies,
            log_level: env_or("FORMRELAY_LOG_LEVEL", "info"),
        })
    }

    pub fn dev_mode(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Token and chat id travel together: both set enables delivery, both unset
/// disables it, anything else is rejected at startup.
pub fn telegram_from_parts(
    bot_token: Option<String>,
    chat_id: Option<String>,
    api_base: String,
) -> Result<Option<TelegramConfig>, String> {
    match (bot_token, chat_id) {
        (Some(bot_token), Some(chat_id)) => Ok(Some(TelegramConfig {
            bot_token,
            chat_id,
            api_base: api_base.trim_end_matches('/').to_string(),
        })),
        (None, None) => Ok(None),
        (Some(_), None) => Err("TELEGRAM_BOT_TOKEN is set but TELEGRAM_CHAT_ID is missing".to_string()),
        (None, Some(_)) => Err("TELEGRAM_CHAT_ID is set but TELEGRAM_BOT_TOKEN is missing".to_string()),
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}
