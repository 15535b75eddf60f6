use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;

pub fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "error": message.into()
    }))
}

pub fn internal_error(message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}
