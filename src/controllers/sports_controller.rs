use crate::services::sports_api::SportsApi;
use crate::utils::responses::internal_error;
use actix_web::{get, web, HttpResponse, Responder};
use log::error;

#[get("/sports/live-matches")]
pub async fn live_matches(api: web::Data<SportsApi>) -> impl Responder {
    match api.live_matches().await {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => {
            error!("Error fetching live matches: {}", e);
            internal_error("Failed to fetch live matches")
        }
    }
}

#[get("/sports/predictions/{fixture_id}")]
pub async fn fixture_prediction(api: web::Data<SportsApi>, path: web::Path<u32>) -> impl Responder {
    let fixture_id = path.into_inner();
    match api.prediction(fixture_id).await {
        Ok(prediction) => HttpResponse::Ok().json(prediction),
        Err(e) => {
            error!("Error fetching prediction for fixture {}: {}", fixture_id, e);
            internal_error("Failed to fetch prediction")
        }
    }
}

#[get("/sports/team-stats/{team_id}")]
pub async fn team_stats(api: web::Data<SportsApi>, path: web::Path<u32>) -> impl Responder {
    let team_id = path.into_inner();
    match api.team_stats(team_id).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            error!("Error fetching team stats for team {}: {}", team_id, e);
            internal_error("Failed to fetch team stats")
        }
    }
}

#[get("/sports/historical-matches/{team_id}")]
pub async fn historical_matches(api: web::Data<SportsApi>, path: web::Path<u32>) -> impl Responder {
    let team_id = path.into_inner();
    match api.historical_matches(team_id).await {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => {
            error!("Error fetching historical matches for team {}: {}", team_id, e);
            internal_error("Failed to fetch historical matches")
        }
    }
}
