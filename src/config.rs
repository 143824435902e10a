// src/config.rs

use std::env;
use std::fmt;

use chrono::Duration;
use thiserror::Error;

const ENVIRONMENTS: [&str; 4] = ["development", "production", "staging", "local"];

/// Longest accepted token lifetime, ten years.
const MAX_TOKEN_LIFETIME_DAYS: i64 = 3650;

#[derive(Debug, Error)]
#[error("Config validation error: {0}")]
pub struct ConfigError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Staging,
    Local,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Local => "local",
        };
        f.write_str(name)
    }
}

/// Loads the env file matching `NODE_ENV` into the process environment.
/// Returns the file name when one was found.
pub fn load_env_file() -> Option<&'static str> {
    let env_file = env_file_for(env::var("NODE_ENV").ok().as_deref());
    dotenv::from_filename(env_file).ok().map(|_| env_file)
}

/// Env file name for a `NODE_ENV` value.
pub fn env_file_for(node_env: Option<&str>) -> &'static str {
    match node_env {
        Some("staging") => ".env.staging",
        Some("production") => ".env.production",
        _ => ".env",
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub env: Environment,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_token_expire: Duration,
    pub mongo_uri: String,
    pub mongo_db_name: String,
    pub common_email: String,
    pub common_password: String,
    pub smtp_host: String,
}

impl Config {
    /// Reads the process environment. Call [`load_env_file`] first.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source, applying defaults and validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let env = match var("NODE_ENV", "development").as_str() {
            "development" => Environment::Development,
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            "local" => Environment::Local,
            other => {
                return Err(ConfigError(format!(
                    "\"NODE_ENV\" must be one of [{}], got \"{}\"",
                    ENVIRONMENTS.join(", "),
                    other
                )))
            }
        };

        let port = var("PORT", "4003");
        let server_port = port
            .parse()
            .map_err(|_| ConfigError(format!("\"PORT\" must be a number, got \"{}\"", port)))?;

        let jwt_secret = var("JWT_SECRET", "TORUM!@!#$$%@%$");
        if jwt_secret.is_empty() {
            return Err(ConfigError("\"JWT_SECRET\" is not allowed to be empty".into()));
        }

        let expire = var("JWT_TOKEN_EXPIRE", "1d");
        let jwt_token_expire = parse_duration(&expire).ok_or_else(|| {
            ConfigError(format!("\"JWT_TOKEN_EXPIRE\" is not a valid duration: \"{}\"", expire))
        })?;

        Ok(Self {
            env,
            server_host: var("HOST", "0.0.0.0"),
            server_port,
            jwt_secret,
            jwt_token_expire,
            mongo_uri: var("MONGO_DB_URI", ""),
            mongo_db_name: var("MONGO_DB_NAME", "qhrms"),
            common_email: var("COMMON_EMAIL", ""),
            common_password: var("COMMON_PASSWORD", ""),
            smtp_host: var("SMTP_HOST", "smtp.gmail.com"),
        })
    }
}

/// Parses `"90"` (seconds) or a number followed by one of `s`, `m`, `h`, `d`, `w`.
/// Zero, out-of-range and over ten-year lifetimes are rejected.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    let split = input.find(|c: char| !c.is_ascii_digit()).unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);
    let n: i64 = digits.parse().ok()?;
    let duration = match unit.trim() {
        "" | "s" => Duration::try_seconds(n)?,
        "m" => Duration::try_minutes(n)?,
        "h" => Duration::try_hours(n)?,
        "d" => Duration::try_days(n)?,
        "w" => Duration::try_weeks(n)?,
        _ => return None,
    };
    (n > 0 && duration.num_days() <= MAX_TOKEN_LIFETIME_DAYS).then_some(duration)
}
