use crate::models::match_model::Scores;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct CreateMatchRequest {
    #[validate(length(min = 1, message = "host_id must not be empty"))]
    pub host_id: String,

    #[serde(rename = "type")]
    pub match_type: String,

    #[validate(range(min = 0.0, message = "buy_in must not be negative"))]
    pub buy_in: f64,

    #[serde(default)]
    pub questions: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateMatchResponse {
    pub match_id: Uuid,
    pub invite_code: String,
}

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct JoinMatchRequest {
    #[validate(length(min = 1, message = "user_id must not be empty"))]
    pub user_id: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JoinMatchResponse {
    pub match_id: Uuid,
    pub status: String,
}

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct SubmitPredictionsRequest {
    #[validate(length(min = 1, message = "user_id must not be empty"))]
    pub user_id: String,

    #[serde(default)]
    pub predictions: HashMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SubmitPredictionsResponse {
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MatchResultsResponse {
    pub match_id: Uuid,
    pub scores: Scores,
    pub winner: String,
}
