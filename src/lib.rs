pub mod config;
pub mod controllers;
pub mod errors;
pub mod models;
pub mod services;
pub mod store;
pub mod types;
pub mod utils;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{error, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};
use std::io;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::controllers::match_controller::{create_match, join_match, match_results, submit_predictions};
use crate::controllers::sports_controller::{fixture_prediction, historical_matches, live_matches, team_stats};
use crate::services::sports_api::SportsApi;
use crate::store::{MatchStore, MemoryStore, PgStore};
use crate::utils::responses::error_response;

async fn health() -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(r#"{"status": "Ok"}"#)
}

/// Registers every route plus extractor configs that render failures as
/// `{"error": ...}` bodies.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = error_response(StatusCode::BAD_REQUEST, err.to_string());
        error::InternalError::from_response(err, response).into()
    });
    let path_config = web::PathConfig::default().error_handler(|err, _req| {
        let response = error_response(StatusCode::NOT_FOUND, err.to_string());
        error::InternalError::from_response(err, response).into()
    });

    cfg.app_data(json_config)
        .app_data(path_config)
        .route("/health", web::get().to(health))
        .service(create_match)
        .service(join_match)
        .service(submit_predictions)
        .service(match_results)
        .service(live_matches)
        .service(fixture_prediction)
        .service(team_stats)
        .service(historical_matches);
}

/// Allows only `origin` when set, otherwise any origin. `*` also means any
/// origin.
pub fn cors(origin: Option<&str>) -> Cors {
    let cors = match origin.map(str::trim) {
        Some(origin) if origin != "*" => Cors::default().allowed_origin(origin),
        _ => Cors::default().allow_any_origin(),
    };
    cors.allow_any_method().allow_any_header()
}

pub async fn open_store(config: &AppConfig) -> io::Result<Arc<dyn MatchStore>> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections)
                .await
                .map_err(io::Error::other)?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set, matches are kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Serves the gateway until shutdown, then closes the store.
pub async fn run(config: AppConfig) -> io::Result<()> {
    let store = open_store(&config).await?;
    let sports = SportsApi::new(&config.sports).map_err(io::Error::other)?;

    let store_data: web::Data<dyn MatchStore> = web::Data::from(store.clone());
    let sports_data = web::Data::new(sports);
    let cors_origin = config.cors_origin.clone();

    info!("Server running on {}:{}", config.host, config.port);

    let served = HttpServer::new(move || {
        App::new()
            .wrap(cors(cors_origin.as_deref()))
            .wrap(Logger::default())
            .app_data(store_data.clone())
            .app_data(sports_data.clone())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    store.close().await;
    served
}
