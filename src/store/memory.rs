use super::{MatchStore, StoreError, StoreResult};
use crate::models::match_model::{Match, MatchStatus, NewMatch, NewPrediction, Prediction, Scores};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    matches: HashMap<Uuid, Match>,
    invite_codes: HashMap<String, Uuid>,
    predictions: Vec<Prediction>,
}

/// In-process store with the same constraints as the Postgres schema: unique
/// invite codes, unique participants per match, and predictions that must
/// reference an existing match.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn create_match(&self, new_match: NewMatch) -> StoreResult<Match> {
        let mut state = self.state.lock().await;
        if state.invite_codes.contains_key(&new_match.invite_code) {
            return Err(StoreError::DuplicateInviteCode(new_match.invite_code));
        }

        let created = Match {
            match_id: Uuid::new_v4(),
            participants: vec![new_match.host_id.clone()],
            host_id: new_match.host_id,
            match_type: new_match.match_type,
            buy_in: new_match.buy_in,
            invite_code: new_match.invite_code,
            questions: new_match.questions,
            status: MatchStatus::Pending,
            winner: None,
            scores: None,
            created_at: Utc::now(),
        };

        state
            .invite_codes
            .insert(created.invite_code.clone(), created.match_id);
        state.matches.insert(created.match_id, created.clone());
        Ok(created)
    }

    async fn find_by_invite_code(&self, invite_code: &str) -> StoreResult<Option<Match>> {
        let state = self.state.lock().await;
        Ok(state
            .invite_codes
            .get(invite_code)
            .and_then(|id| state.matches.get(id))
            .cloned())
    }

    async fn find_by_id(&self, match_id: Uuid) -> StoreResult<Option<Match>> {
        let state = self.state.lock().await;
        Ok(state.matches.get(&match_id).cloned())
    }

    async fn add_participant(&self, match_id: Uuid, user_id: &str) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let found = state
            .matches
            .get_mut(&match_id)
            .ok_or(StoreError::MatchNotFound(match_id))?;

        if found.participants.iter().any(|p| p == user_id) {
            return Ok(false);
        }
        found.participants.push(user_id.to_string());
        Ok(true)
    }

    async fn insert_prediction(&self, new_prediction: NewPrediction) -> StoreResult<Prediction> {
        let mut state = self.state.lock().await;
        if !state.matches.contains_key(&new_prediction.match_id) {
            return Err(StoreError::MatchNotFound(new_prediction.match_id));
        }

        let prediction = Prediction {
            prediction_id: Uuid::new_v4(),
            match_id: new_prediction.match_id,
            user_id: new_prediction.user_id,
            predictions: new_prediction.predictions,
            created_at: Utc::now(),
        };
        state.predictions.push(prediction.clone());
        Ok(prediction)
    }

    async fn predictions_for_match(&self, match_id: Uuid) -> StoreResult<Vec<Prediction>> {
        let state = self.state.lock().await;
        Ok(state
            .predictions
            .iter()
            .filter(|p| p.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn complete_match(&self, match_id: Uuid, scores: &Scores, winner: &str) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let found = state
            .matches
            .get_mut(&match_id)
            .ok_or(StoreError::MatchNotFound(match_id))?;

        if found.status != MatchStatus::Pending {
            return Ok(false);
        }
        found.status = MatchStatus::Completed;
        found.winner = Some(winner.to_string());
        found.scores = Some(scores.clone());
        Ok(true)
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_match(code: &str) -> NewMatch {
        NewMatch {
            host_id: "h1".into(),
            match_type: "football".into(),
            buy_in: 10.0,
            invite_code: code.into(),
            questions: vec!["Q1".into()],
        }
    }

    #[tokio::test]
    async fn created_match_is_pending_with_host_as_only_participant() {
        let store = MemoryStore::new();
        let created = store.create_match(new_match("abcd1234")).await.unwrap();

        assert_eq!(created.status, MatchStatus::Pending);
        assert_eq!(created.participants, vec!["h1".to_string()]);
        assert_eq!(created.winner, None);

        let by_code = store.find_by_invite_code("abcd1234").await.unwrap().unwrap();
        assert_eq!(by_code.match_id, created.match_id);
    }

    #[tokio::test]
    async fn duplicate_invite_code_is_rejected() {
        let store = MemoryStore::new();
        store.create_match(new_match("abcd1234")).await.unwrap();
        let err = store.create_match(new_match("abcd1234")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateInviteCode(code) if code == "abcd1234"));
    }

    #[tokio::test]
    async fn participants_are_added_once() {
        let store = MemoryStore::new();
        let created = store.create_match(new_match("abcd1234")).await.unwrap();

        assert!(store.add_participant(created.match_id, "u2").await.unwrap());
        assert!(!store.add_participant(created.match_id, "u2").await.unwrap());
        assert!(!store.add_participant(created.match_id, "h1").await.unwrap());

        let found = store.find_by_id(created.match_id).await.unwrap().unwrap();
        assert_eq!(found.participants, vec!["h1".to_string(), "u2".to_string()]);
    }

    #[tokio::test]
    async fn prediction_for_unknown_match_fails() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();
        let err = store
            .insert_prediction(NewPrediction {
                match_id: missing,
                user_id: "u2".into(),
                predictions: HashMap::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MatchNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn match_completes_only_once() {
        let store = MemoryStore::new();
        let created = store.create_match(new_match("abcd1234")).await.unwrap();

        let mut scores = Scores::new();
        scores.insert("h1".into(), 7);
        assert!(store.complete_match(created.match_id, &scores, "h1").await.unwrap());

        let mut other = Scores::new();
        other.insert("h1".into(), 2);
        assert!(!store.complete_match(created.match_id, &other, "h1").await.unwrap());

        let found = store.find_by_id(created.match_id).await.unwrap().unwrap();
        assert_eq!(found.status, MatchStatus::Completed);
        assert_eq!(found.scores, Some(scores));
    }
}
