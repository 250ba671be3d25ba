//! End-to-end tests for the cafe HTTP surface
//!
//! Each test opens a fresh SQLite file and drives the full router, middleware
//! included, through `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use cafe_api::cafe::CafeDb;
use cafe_api::{create_router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashSet;
use tempfile::TempDir;
use tower::ServiceExt;

async fn create_test_app() -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("cafes.db");
    let db = CafeDb::new(db_path.to_str().unwrap())
        .await
        .expect("Failed to create test database");
    (create_router(AppState::new(db)), temp_dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/cafe/add")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

async fn patch(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("PATCH")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn cafe_json(name: &str, location: &str) -> Value {
    json!({
        "name": name,
        "map_url": "https://g.page/acehotellondon?share",
        "img_url": "https://example.com/cafe.jpg",
        "location": location,
        "seats": "50+",
        "has_toilet": true,
        "has_wifi": true,
        "has_sockets": true,
        "can_take_calls": false,
        "coffee_price": "£3.00"
    })
}

#[tokio::test]
async fn test_landing_page() {
    let (app, _temp_dir) = create_test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_health() {
    let (app, _temp_dir) = create_test_app().await;
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_add_then_search_scenario() {
    let (app, _temp_dir) = create_test_app().await;

    let body = r#"{"name":"X","map_url":"m","img_url":"i","location":"L","seats":"10+","has_toilet":true,"has_wifi":true,"has_sockets":false,"can_take_calls":false}"#;
    let (status, response) = post_json(&app, body.to_string()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        response,
        json!({ "response": { "success": "Successfully added the new cafe." } })
    );

    let (status, response) = get(&app, "/cafe/search?location=L").await;
    assert_eq!(status, StatusCode::OK);
    let cafes = response["cafe_all"].as_array().unwrap();
    assert_eq!(cafes.len(), 1);

    let cafe = &cafes[0];
    assert!(cafe["id"].is_i64());
    assert_eq!(cafe["name"], "X");
    assert_eq!(cafe["seats"], "10+");
    assert_eq!(cafe["has_sockets"], false);
    assert_eq!(cafe["coffee_price"], Value::Null);
}

#[tokio::test]
async fn test_search_no_match_is_200_with_error_body() {
    let (app, _temp_dir) = create_test_app().await;
    post_json(&app, cafe_json("Somewhere", "Peckham").to_string()).await;

    for uri in ["/cafe/search?location=peckham", "/cafe/search"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["error"]["Not Found"].is_string(), "body: {}", body);
        assert!(body.get("cafe_all").is_none());
    }
}

#[tokio::test]
async fn test_all_returns_records_in_column_order() {
    let (app, _temp_dir) = create_test_app().await;

    let (status, body) = get(&app, "/cafe/all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "cafe_all": [] }));

    post_json(&app, cafe_json("First", "Shoreditch").to_string()).await;
    post_json(&app, cafe_json("Second", "Hackney").to_string()).await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/cafe/all").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(
        text.starts_with(r#"{"cafe_all":[{"id":1,"name":"First","map_url""#),
        "unexpected body: {}",
        text
    );
    assert!(text.contains(r#""can_take_calls":false,"coffee_price":"£3.00"}"#));
}

#[tokio::test]
async fn test_random_returns_existing_cafes() {
    let (app, _temp_dir) = create_test_app().await;

    let (status, _) = get(&app, "/cafe/random").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let names: HashSet<String> = ["Alpha", "Beta", "Gamma"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for name in &names {
        post_json(&app, cafe_json(name, "Soho").to_string()).await;
    }

    let mut seen = HashSet::new();
    for _ in 0..60 {
        let (status, body) = get(&app, "/cafe/random").await;
        assert_eq!(status, StatusCode::OK);
        let name = body["cafe"]["name"].as_str().unwrap().to_string();
        assert!(names.contains(&name));
        seen.insert(name);
    }
    // Missing any one of three ids in 60 fair draws has probability ~3 * (2/3)^60
    assert_eq!(seen, names);
}

#[tokio::test]
async fn test_add_rejects_bad_bodies() {
    let (app, _temp_dir) = create_test_app().await;

    for body in ["", "{not json", "{}"] {
        let (status, response) = post_json(&app, body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
        assert_eq!(
            response["error"]["Bad Request"],
            "No JSON data provided or invalid JSON format."
        );
    }

    let (_, body) = get(&app, "/cafe/all").await;
    assert_eq!(body["cafe_all"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_add_missing_field_is_500() {
    let (app, _temp_dir) = create_test_app().await;

    let mut missing = cafe_json("Incomplete", "Soho");
    missing.as_object_mut().unwrap().remove("has_wifi");
    let (status, body) = post_json(&app, missing.to_string()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "response": { "error": "Could not create new cafe." } })
    );

    let (_, body) = get(&app, "/cafe/all").await;
    assert_eq!(body["cafe_all"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_add_accepts_loose_payloads() {
    let (app, _temp_dir) = create_test_app().await;

    let blank_name = cafe_json("", "Blank");
    let (status, _) = post_json(&app, blank_name.to_string()).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut with_id = cafe_json("Has Id", "WithId");
    with_id["id"] = json!(500);
    let (status, _) = post_json(&app, with_id.to_string()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = get(&app, "/cafe/search?location=WithId").await;
    assert_eq!(body["cafe_all"][0]["id"], 2);

    let mut numeric_flags = cafe_json("Numeric", "Flags");
    numeric_flags["has_toilet"] = json!(1);
    numeric_flags["has_wifi"] = json!(0);
    let (status, _) = post_json(&app, numeric_flags.to_string()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = get(&app, "/cafe/search?location=Flags").await;
    assert_eq!(body["cafe_all"][0]["has_toilet"], true);
    assert_eq!(body["cafe_all"][0]["has_wifi"], false);
}

#[tokio::test]
async fn test_add_duplicate_name_is_500() {
    let (app, _temp_dir) = create_test_app().await;
    let (status, _) = post_json(&app, cafe_json("Twin", "Soho").to_string()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(&app, cafe_json("Twin", "Camden").to_string()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "response": { "error": "Could not create new cafe." } })
    );
}

#[tokio::test]
async fn test_update_coffee_price() {
    let (app, _temp_dir) = create_test_app().await;
    post_json(&app, cafe_json("Pricey", "Mayfair").to_string()).await;

    let (status, body) = patch(&app, "/cafe/update-coffee-price/1?new_price=4.50").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": "price updated." }));

    let (_, body) = get(&app, "/cafe/search?location=Mayfair").await;
    assert_eq!(body["cafe_all"][0]["coffee_price"], "4.50");

    let (status, _) = patch(&app, "/cafe/update-coffee-price/1").await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&app, "/cafe/search?location=Mayfair").await;
    assert_eq!(body["cafe_all"][0]["coffee_price"], Value::Null);
}

#[tokio::test]
async fn test_update_coffee_price_unknown_id() {
    let (app, _temp_dir) = create_test_app().await;

    let (status, body) = patch(&app, "/cafe/update-coffee-price/404?new_price=1.00").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "error": { "message": "cafe with id 404 not found." } })
    );

    let (status, body) = patch(&app, "/cafe/update-coffee-price/abc?new_price=1.00").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "error": { "message": "cafe with id abc not found." } })
    );
}

#[tokio::test]
async fn test_resubmitting_a_record_reproduces_it() {
    let (app, _temp_dir) = create_test_app().await;
    post_json(&app, cafe_json("Original", "Bermondsey").to_string()).await;

    let (_, body) = get(&app, "/cafe/search?location=Bermondsey").await;
    let mut copy = body["cafe_all"][0].clone();
    let fields = copy.as_object_mut().unwrap();
    fields.remove("id");
    fields.insert("name".to_string(), json!("Copy"));

    let (status, _) = post_json(&app, copy.to_string()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = get(&app, "/cafe/search?location=Bermondsey").await;
    let cafes = body["cafe_all"].as_array().unwrap();
    assert_eq!(cafes.len(), 2);

    let strip = |cafe: &Value| {
        let mut cafe = cafe.clone();
        let fields = cafe.as_object_mut().unwrap();
        fields.remove("id");
        fields.remove("name");
        cafe
    };
    assert_eq!(strip(&cafes[0]), strip(&cafes[1]));
}
