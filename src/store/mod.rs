pub mod memory;
pub mod postgres;

use crate::models::match_model::{Match, NewMatch, NewPrediction, Prediction, Scores};
use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
    Serialization(String),
    DuplicateInviteCode(String),
    MatchNotFound(Uuid),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "database error: {e}"),
            StoreError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StoreError::DuplicateInviteCode(code) => write!(f, "invite code already in use: {code}"),
            StoreError::MatchNotFound(id) => write!(f, "match {id} does not exist"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e)
    }
}

/// Storage handle shared by the match handlers.
///
/// Participant inserts and match completion are atomic at this layer, so
/// concurrent joins never drop a participant and a match completes once.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Persists a pending match whose only participant is the host.
    async fn create_match(&self, new_match: NewMatch) -> StoreResult<Match>;

    async fn find_by_invite_code(&self, invite_code: &str) -> StoreResult<Option<Match>>;

    async fn find_by_id(&self, match_id: Uuid) -> StoreResult<Option<Match>>;

    /// Adds `user_id` to the participants unless already present. Returns
    /// whether a row was added.
    async fn add_participant(&self, match_id: Uuid, user_id: &str) -> StoreResult<bool>;

    async fn insert_prediction(&self, new_prediction: NewPrediction) -> StoreResult<Prediction>;

    /// Predictions of a match in submission order.
    async fn predictions_for_match(&self, match_id: Uuid) -> StoreResult<Vec<Prediction>>;

    /// Marks a pending match completed with its scores and winner. Returns
    /// false when the match was not pending.
    async fn complete_match(&self, match_id: Uuid, scores: &Scores, winner: &str) -> StoreResult<bool>;

    async fn close(&self);
}
