use crate::store::StoreError;
use crate::utils::responses::error_response;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use std::fmt;

/// Failure of a match lifecycle handler.
#[derive(Debug)]
pub enum MatchError {
    NotFound,
    Validation(String),
    NoPredictions,
    Storage(StoreError),
}

impl MatchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MatchError::NotFound => StatusCode::NOT_FOUND,
            MatchError::Validation(_) => StatusCode::BAD_REQUEST,
            MatchError::NoPredictions => StatusCode::CONFLICT,
            MatchError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Renders the `{"error": ...}` body. Storage failures are reported with
    /// `fallback` so database details never reach the caller.
    pub fn to_response(&self, fallback: &str) -> HttpResponse {
        let message = match self {
            MatchError::NotFound => "Match not found".to_string(),
            MatchError::Validation(msg) => msg.clone(),
            MatchError::NoPredictions => "No predictions submitted for this match".to_string(),
            MatchError::Storage(_) => fallback.to_string(),
        };
        error_response(self.status_code(), message)
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::NotFound => write!(f, "match not found"),
            MatchError::Validation(msg) => write!(f, "validation failed: {msg}"),
            MatchError::NoPredictions => write!(f, "no predictions submitted"),
            MatchError::Storage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for MatchError {}

impl From<StoreError> for MatchError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::MatchNotFound(_) => MatchError::NotFound,
            other => MatchError::Storage(other),
        }
    }
}

impl From<validator::ValidationErrors> for MatchError {
    fn from(e: validator::ValidationErrors) -> Self {
        MatchError::Validation(e.to_string())
    }
}
