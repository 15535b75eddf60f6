use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SPORTS_API_BASE_URL: &str = "https://api-football-v1.p.rapidapi.com/v3";
pub const DEFAULT_SPORTS_API_HOST: &str = "api-football-v1.p.rapidapi.com";
/// Premier League.
pub const DEFAULT_LEAGUE_ID: u32 = 39;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub sports: SportsApiConfig,
}

#[derive(Debug, Clone)]
pub struct SportsApiConfig {
    pub base_url: String,
    pub api_host: String,
    pub api_key: String,
    pub league_id: u32,
    pub timeout: Duration,
}

impl Default for SportsApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SPORTS_API_BASE_URL.to_string(),
            api_host: DEFAULT_SPORTS_API_HOST.to_string(),
            api_key: String::new(),
            league_id: DEFAULT_LEAGUE_ID,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value for {key}: {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let sports = SportsApiConfig {
            base_url: get("SPORTS_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SPORTS_API_BASE_URL.to_string()),
            api_host: get("SPORTS_API_HOST").unwrap_or_else(|| DEFAULT_SPORTS_API_HOST.to_string()),
            api_key: get("API_FOOTBALL_KEY").unwrap_or_default(),
            league_id: parse_or(get("SPORTS_LEAGUE_ID"), "SPORTS_LEAGUE_ID", DEFAULT_LEAGUE_ID)?,
            timeout: Duration::from_secs(parse_nonzero(
                get("SPORTS_API_TIMEOUT_SECS"),
                "SPORTS_API_TIMEOUT_SECS",
                10u64,
            )?),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("PORT"), "PORT", 3000u16)?,
            cors_origin: get("CORS_ORIGIN"),
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_nonzero(
                get("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                5u32,
            )?,
            sports,
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
    }
}

/// Like [`parse_or`], but rejects `0`.
fn parse_nonzero<T>(raw: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
{
    let value = parse_or(raw.clone(), key, default)?;
    if value == T::default() {
        return Err(ConfigError::Invalid {
            key: key.to_string(),
            value: raw.unwrap_or_default(),
        });
    }
    Ok(value)
}
