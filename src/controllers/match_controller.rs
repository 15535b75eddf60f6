use crate::errors::MatchError;
use crate::models::match_model::{Match, NewMatch, NewPrediction};
use crate::services::scoring::{mock_scores, select_winner};
use crate::store::{MatchStore, StoreError};
use crate::types::match_types::{
    CreateMatchRequest, CreateMatchResponse, JoinMatchRequest, JoinMatchResponse,
    MatchResultsResponse, SubmitPredictionsRequest, SubmitPredictionsResponse,
};
use crate::utils::invite_code::generate_invite_code;
use actix_web::{get, post, web, HttpResponse, Responder};
use log::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

const INVITE_CODE_ATTEMPTS: usize = 3;

#[post("/matches")]
pub async fn create_match(
    store: web::Data<dyn MatchStore>,
    req: web::Json<CreateMatchRequest>,
) -> impl Responder {
    if let Err(e) = req.validate() {
        return MatchError::from(e).to_response("Failed to create match");
    }

    let req = req.into_inner();
    let mut attempt = 0;

    loop {
        attempt += 1;
        let new_match = NewMatch {
            host_id: req.host_id.clone(),
            match_type: req.match_type.clone(),
            buy_in: req.buy_in,
            invite_code: generate_invite_code(),
            questions: req.questions.clone(),
        };

        match store.create_match(new_match).await {
            Ok(created) => {
                info!(
                    "Created match: match_id={}, host_id={}, invite_code={}",
                    created.match_id, created.host_id, created.invite_code
                );
                return HttpResponse::Ok().json(CreateMatchResponse {
                    match_id: created.match_id,
                    invite_code: created.invite_code,
                });
            }
            Err(StoreError::DuplicateInviteCode(code)) if attempt < INVITE_CODE_ATTEMPTS => {
                warn!("Invite code collision on {}, regenerating", code);
            }
            Err(e) => {
                error!("Error creating match: {}", e);
                return MatchError::from(e).to_response("Failed to create match");
            }
        }
    }
}

#[post("/matches/{invite_code}/join")]
pub async fn join_match(
    store: web::Data<dyn MatchStore>,
    path: web::Path<String>,
    req: web::Json<JoinMatchRequest>,
) -> impl Responder {
    if let Err(e) = req.validate() {
        return MatchError::from(e).to_response("Failed to join match");
    }
    let invite_code = path.into_inner();

    let found = match store.find_by_invite_code(&invite_code).await {
        Ok(Some(found)) => found,
        Ok(None) => return MatchError::NotFound.to_response("Failed to join match"),
        Err(e) => {
            error!("Error joining match: {}", e);
            return MatchError::from(e).to_response("Failed to join match");
        }
    };

    match store.add_participant(found.match_id, &req.user_id).await {
        Ok(added) => {
            if added {
                info!("User {} joined match {}", req.user_id, found.match_id);
            }
            HttpResponse::Ok().json(JoinMatchResponse {
                match_id: found.match_id,
                status: "joined".to_string(),
            })
        }
        Err(e) => {
            error!("Error joining match: {}", e);
            MatchError::from(e).to_response("Failed to join match")
        }
    }
}

#[post("/matches/{id}/predictions")]
pub async fn submit_predictions(
    store: web::Data<dyn MatchStore>,
    path: web::Path<Uuid>,
    req: web::Json<SubmitPredictionsRequest>,
) -> impl Responder {
    if let Err(e) = req.validate() {
        return MatchError::from(e).to_response("Failed to submit predictions");
    }
    let match_id = path.into_inner();
    let req = req.into_inner();

    let new_prediction = NewPrediction {
        match_id,
        user_id: req.user_id,
        predictions: req.predictions,
    };

    match store.insert_prediction(new_prediction).await {
        Ok(saved) => {
            info!(
                "Stored prediction {} for user {} in match {}",
                saved.prediction_id, saved.user_id, match_id
            );
            HttpResponse::Ok().json(SubmitPredictionsResponse {
                status: "submitted".to_string(),
            })
        }
        Err(e) => {
            error!("Error submitting predictions: {}", e);
            MatchError::from(e).to_response("Failed to submit predictions")
        }
    }
}

#[get("/matches/{id}/results")]
pub async fn match_results(
    store: web::Data<dyn MatchStore>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let match_id = path.into_inner();

    match compute_results(store.get_ref(), match_id).await {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => {
            if matches!(e, MatchError::Storage(_)) {
                error!("Error calculating results for {}: {}", match_id, e);
            } else {
                warn!("Results unavailable for {}: {}", match_id, e);
            }
            e.to_response("Failed to calculate results")
        }
    }
}

async fn compute_results(
    store: &dyn MatchStore,
    match_id: Uuid,
) -> Result<MatchResultsResponse, MatchError> {
    let found = store.find_by_id(match_id).await?.ok_or(MatchError::NotFound)?;
    if found.is_completed() {
        return stored_results(found);
    }

    let predictions = store.predictions_for_match(match_id).await?;
    let scores = mock_scores(&predictions, &mut rand::thread_rng());
    let winner = select_winner(&scores)
        .ok_or(MatchError::NoPredictions)?
        .to_string();

    if store.complete_match(match_id, &scores, &winner).await? {
        info!("Match {} completed, winner={}", match_id, winner);
        return Ok(MatchResultsResponse {
            match_id,
            scores,
            winner,
        });
    }

    // Another request completed the match between our read and update.
    let found = store.find_by_id(match_id).await?.ok_or(MatchError::NotFound)?;
    stored_results(found)
}

fn stored_results(found: Match) -> Result<MatchResultsResponse, MatchError> {
    match (found.scores, found.winner) {
        (Some(scores), Some(winner)) => Ok(MatchResultsResponse {
            match_id: found.match_id,
            scores,
            winner,
        }),
        _ => Err(MatchError::Storage(StoreError::Serialization(format!(
            "completed match {} has no stored results",
            found.match_id
        )))),
    }
}
