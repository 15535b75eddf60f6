use super::{MatchStore, StoreError, StoreResult};
use crate::models::match_model::{
    scores_to_entries, Match, MatchStatus, MatchTable, NewMatch, NewPrediction, Prediction,
    PredictionTable, Scores,
};
use async_trait::async_trait;
use log::info;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use uuid::Uuid;

const MATCH_COLUMNS: &str = r#"match_id, host_id, "type", buy_in, invite_code, questions,
    status, winner, scores, created_at"#;

/// Postgres-backed store. Table layout lives in `sql/schema.sql`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("Connected to Postgres Database");
        Ok(Self::new(pool))
    }

    async fn participants(&self, match_id: Uuid) -> StoreResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT user_id
            FROM match_participants
            WHERE match_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }

    async fn hydrate(&self, row: MatchTable) -> StoreResult<Match> {
        let participants = self.participants(row.match_id).await?;
        Match::from_row(row, participants).map_err(StoreError::Serialization)
    }
}

#[async_trait]
impl MatchStore for PgStore {
    async fn create_match(&self, new_match: NewMatch) -> StoreResult<Match> {
        let mut tx = self.pool.begin().await?;

        let insert = sqlx::query_as::<_, MatchTable>(&format!(
            r#"
            INSERT INTO matches (match_id, host_id, "type", buy_in, invite_code, questions, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {MATCH_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_match.host_id)
        .bind(&new_match.match_type)
        .bind(new_match.buy_in)
        .bind(&new_match.invite_code)
        .bind(Json(&new_match.questions))
        .bind(MatchStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await;

        let row = match insert {
            Ok(row) => row,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                let _ = tx.rollback().await;
                return Err(StoreError::DuplicateInviteCode(new_match.invite_code));
            }
            Err(e) => {
                let _ = tx.rollback().await;
                return Err(e.into());
            }
        };

        sqlx::query(
            r#"
            INSERT INTO match_participants (match_id, user_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(row.match_id)
        .bind(&new_match.host_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Match::from_row(row, vec![new_match.host_id]).map_err(StoreError::Serialization)
    }

    async fn find_by_invite_code(&self, invite_code: &str) -> StoreResult<Option<Match>> {
        let row = sqlx::query_as::<_, MatchTable>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE invite_code = $1"
        ))
        .bind(invite_code)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, match_id: Uuid) -> StoreResult<Option<Match>> {
        let row = sqlx::query_as::<_, MatchTable>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE match_id = $1"
        ))
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn add_participant(&self, match_id: Uuid, user_id: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO match_participants (match_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (match_id, user_id) DO NOTHING
            "#,
        )
        .bind(match_id)
        .bind(user_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Err(StoreError::MatchNotFound(match_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_prediction(&self, new_prediction: NewPrediction) -> StoreResult<Prediction> {
        let result = sqlx::query_as::<_, PredictionTable>(
            r#"
            INSERT INTO predictions (prediction_id, match_id, user_id, predictions)
            VALUES ($1, $2, $3, $4)
            RETURNING prediction_id, match_id, user_id, predictions, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_prediction.match_id)
        .bind(&new_prediction.user_id)
        .bind(Json(&new_prediction.predictions))
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Err(StoreError::MatchNotFound(new_prediction.match_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn predictions_for_match(&self, match_id: Uuid) -> StoreResult<Vec<Prediction>> {
        let rows = sqlx::query_as::<_, PredictionTable>(
            r#"
            SELECT prediction_id, match_id, user_id, predictions, created_at
            FROM predictions
            WHERE match_id = $1
            ORDER BY created_at ASC, prediction_id ASC
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Prediction::from).collect())
    }

    async fn complete_match(&self, match_id: Uuid, scores: &Scores, winner: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE matches
            SET status = $2, winner = $3, scores = $4
            WHERE match_id = $1 AND status = $5
            "#,
        )
        .bind(match_id)
        .bind(MatchStatus::Completed.as_str())
        .bind(winner)
        .bind(Json(scores_to_entries(scores)))
        .bind(MatchStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed Postgres pool");
    }
}
