use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use mockito::Matcher;
use serde_json::{json, Value};
use wager_gateway::config::SportsApiConfig;
use wager_gateway::configure;
use wager_gateway::services::sports_api::SportsApi;

macro_rules! init_app {
    ($server:expr) => {{
        let api = SportsApi::new(&SportsApiConfig {
            base_url: $server.url(),
            api_key: "test-key".into(),
            ..Default::default()
        })
        .unwrap();
        test::init_service(App::new().app_data(web::Data::new(api)).configure(configure)).await
    }};
}

#[actix_web::test]
async fn live_matches_are_relayed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/fixtures")
        .match_query(Matcher::UrlEncoded("live".into(), "all".into()))
        .with_status(200)
        .with_body(r#"{"errors": [], "response": [{"fixture": {"id": 868549}, "goals": {"home": 1, "away": 0}}]}"#)
        .create_async()
        .await;
    let app = init_app!(server);

    let req = test::TestRequest::get().uri("/sports/live-matches").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!([{ "fixture": { "id": 868549 }, "goals": { "home": 1, "away": 0 } }]));
}

#[actix_web::test]
async fn upstream_failure_becomes_500() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/fixtures")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let app = init_app!(server);

    let req = test::TestRequest::get().uri("/sports/live-matches").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Failed to fetch live matches" }));

    let req = test::TestRequest::get()
        .uri("/sports/historical-matches/33")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Failed to fetch historical matches" }));
}

#[actix_web::test]
async fn missing_prediction_is_null() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/predictions")
        .match_query(Matcher::UrlEncoded("fixture".into(), "42".into()))
        .with_status(200)
        .with_body(r#"{"errors": [], "response": []}"#)
        .create_async()
        .await;
    let app = init_app!(server);

    let req = test::TestRequest::get().uri("/sports/predictions/42").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, Value::Null);
}

#[actix_web::test]
async fn team_stats_are_relayed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/teams/statistics")
        .match_query(Matcher::UrlEncoded("team".into(), "33".into()))
        .with_status(200)
        .with_body(r#"{"errors": [], "response": {"team": {"id": 33}, "form": "WWDLW"}}"#)
        .create_async()
        .await;
    let app = init_app!(server);

    let req = test::TestRequest::get().uri("/sports/team-stats/33").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["form"], "WWDLW");
}

#[actix_web::test]
async fn non_numeric_team_id_is_not_found() {
    let server = mockito::Server::new_async().await;
    let app = init_app!(server);

    let req = test::TestRequest::get().uri("/sports/team-stats/arsenal").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}
