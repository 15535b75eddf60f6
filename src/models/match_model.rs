use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Ordered user -> score mapping produced when a match completes.
pub type Scores = IndexMap<String, u32>;

/// Column form of [`Scores`]: a JSON array of `[user_id, score]` pairs, so
/// the order survives JSONB storage.
pub type ScoreEntries = Vec<(String, u32)>;

pub fn scores_to_entries(scores: &Scores) -> ScoreEntries {
    scores.iter().map(|(user, score)| (user.clone(), *score)).collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MatchStatus::Pending),
            "completed" => Ok(MatchStatus::Completed),
            other => Err(format!("unknown match status: {other}")),
        }
    }
}

/// Row of the `matches` table.
#[derive(Debug, Clone, FromRow)]
pub struct MatchTable {
    pub match_id: Uuid,
    pub host_id: String,
    #[sqlx(rename = "type")]
    pub match_type: String,
    pub buy_in: f64,
    pub invite_code: String,
    pub questions: Json<Vec<String>>,
    pub status: String,
    pub winner: Option<String>,
    pub scores: Option<Json<ScoreEntries>>,
    pub created_at: DateTime<Utc>,
}

/// Row of the `predictions` table.
#[derive(Debug, Clone, FromRow)]
pub struct PredictionTable {
    pub prediction_id: Uuid,
    pub match_id: Uuid,
    pub user_id: String,
    pub predictions: Json<HashMap<String, String>>,
    pub created_at: DateTime<Utc>,
}

/// A match together with its participant list, as handlers see it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Match {
    pub match_id: Uuid,
    pub host_id: String,
    #[serde(rename = "type")]
    pub match_type: String,
    pub buy_in: f64,
    pub invite_code: String,
    pub questions: Vec<String>,
    pub participants: Vec<String>,
    pub status: MatchStatus,
    pub winner: Option<String>,
    pub scores: Option<Scores>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn from_row(row: MatchTable, participants: Vec<String>) -> Result<Self, String> {
        Ok(Self {
            match_id: row.match_id,
            host_id: row.host_id,
            match_type: row.match_type,
            buy_in: row.buy_in,
            invite_code: row.invite_code,
            questions: row.questions.0,
            participants,
            status: row.status.parse()?,
            winner: row.winner,
            scores: row.scores.map(|s| s.0.into_iter().collect()),
            created_at: row.created_at,
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Prediction {
    pub prediction_id: Uuid,
    pub match_id: Uuid,
    pub user_id: String,
    pub predictions: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
}

impl From<PredictionTable> for Prediction {
    fn from(row: PredictionTable) -> Self {
        Self {
            prediction_id: row.prediction_id,
            match_id: row.match_id,
            user_id: row.user_id,
            predictions: row.predictions.0,
            created_at: row.created_at,
        }
    }
}

/// Input for inserting a match; the store assigns `match_id` and timestamps.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub host_id: String,
    pub match_type: String,
    pub buy_in: f64,
    pub invite_code: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub match_id: Uuid,
    pub user_id: String,
    pub predictions: HashMap<String, String>,
}
