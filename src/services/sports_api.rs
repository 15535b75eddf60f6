use crate::config::SportsApiConfig;
use chrono::{Datelike, Utc};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type SportsResult<T> = Result<T, SportsError>;

const HISTORICAL_FIXTURE_COUNT: u32 = 10;

#[derive(Debug)]
pub enum SportsError {
    InvalidConfig(String),
    Network(reqwest::Error, String),
    Status(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    /// The provider answered 200 but listed errors (bad key, quota, bad params).
    Rejected(String, String),
}

impl fmt::Display for SportsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SportsError::InvalidConfig(msg) => write!(f, "Invalid sports API config: {msg}"),
            SportsError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            SportsError::Status(e, url) => write!(f, "API error for {url}: {e}"),
            SportsError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            SportsError::Rejected(errors, url) => write!(f, "Request rejected by {url}: {errors}"),
        }
    }
}

impl std::error::Error for SportsError {}

/// API-Football response wrapper. `errors` is `[]` on success and an object
/// keyed by problem otherwise.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    response: Value,
    #[serde(default)]
    errors: Value,
}

/// Read-only client for the API-Football fixtures, statistics and
/// predictions endpoints.
#[derive(Debug, Clone)]
pub struct SportsApi {
    client: Client,
    base_url: String,
    league_id: u32,
    timeout: Duration,
}

impl SportsApi {
    pub fn new(config: &SportsApiConfig) -> SportsResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-rapidapi-host",
            HeaderValue::from_str(&config.api_host)
                .map_err(|e| SportsError::InvalidConfig(format!("api host: {e}")))?,
        );
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| SportsError::InvalidConfig(format!("api key: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-rapidapi-key", key);

        let client = Client::builder()
            .user_agent(concat!("wager-gateway/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| SportsError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            league_id: config.league_id,
            timeout: config.timeout,
        })
    }

    /// Fixtures currently in play.
    pub async fn live_matches(&self) -> SportsResult<Vec<Value>> {
        let envelope = self.get("/fixtures", &[("live", "all".to_string())]).await?;
        Ok(into_list(envelope.response))
    }

    /// Season statistics for a team in the configured league, for the
    /// current calendar year.
    pub async fn team_stats(&self, team_id: u32) -> SportsResult<Option<Value>> {
        let season = Utc::now().year();
        let envelope = self
            .get(
                "/teams/statistics",
                &[
                    ("team", team_id.to_string()),
                    ("league", self.league_id.to_string()),
                    ("season", season.to_string()),
                ],
            )
            .await?;
        Ok(into_single(envelope.response))
    }

    pub async fn prediction(&self, fixture_id: u32) -> SportsResult<Option<Value>> {
        let envelope = self
            .get("/predictions", &[("fixture", fixture_id.to_string())])
            .await?;
        Ok(into_list(envelope.response).into_iter().next())
    }

    /// The last ten fixtures a team played.
    pub async fn historical_matches(&self, team_id: u32) -> SportsResult<Vec<Value>> {
        let envelope = self
            .get(
                "/fixtures",
                &[
                    ("team", team_id.to_string()),
                    ("last", HISTORICAL_FIXTURE_COUNT.to_string()),
                ],
            )
            .await?;
        Ok(into_list(envelope.response))
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> SportsResult<Envelope> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url} {query:?}");

        let response = self
            .client
            .get(&url)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SportsError::Network(e, url.clone()))?;

        let envelope = response
            .error_for_status()
            .map_err(|e| SportsError::Status(e, url.clone()))?
            .json::<Envelope>()
            .await
            .map_err(|e| SportsError::Parsing(e, url.clone()))?;

        if has_errors(&envelope.errors) {
            return Err(SportsError::Rejected(envelope.errors.to_string(), url));
        }
        Ok(envelope)
    }
}

fn has_errors(errors: &Value) -> bool {
    match errors {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn into_list(response: Value) -> Vec<Value> {
    match response {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

fn into_single(response: Value) -> Option<Value> {
    match response {
        Value::Null => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other),
    }
}
