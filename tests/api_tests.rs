use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use cheese_api::{
    api::{create_router, AppState},
    catalog::{csv_source::parse_catalog, Catalog},
    services::VectorAlignment,
};

const CATALOG: &str = "\
cheese,milk,country,type,texture,rind,flavor,aroma,vegetarian,vegan
Brie,cow,France,soft,\"creamy, soft\",bloomy,mild,buttery,FALSE,FALSE
Cheddar,cow,England,hard,\"firm, crumbly\",natural,sharp,nutty,TRUE,FALSE
Chevre,goat,France,soft,creamy,NA,tangy,earthy,TRUE,FALSE
Mystery,NA,NA,NA,NA,NA,NA,NA,FALSE,FALSE
";

fn create_test_server() -> TestServer {
    let records = parse_catalog(CATALOG.as_bytes()).unwrap();
    let catalog = Catalog::new(records, VectorAlignment::Positional);
    let state = AppState::in_memory(catalog, 42);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn names(body: &Value) -> Vec<String> {
    let mut names: Vec<String> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["cheeseName"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cheeses"], 4);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-abc"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "trace-abc");

    let response = server.get("/health").await;
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_recommend_filters_by_preferences() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({
            "milk": "cow",
            "type": "soft",
            "rind": "N/A"
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(names(&body), vec!["Brie"]);
    assert_eq!(body["preferences"]["milk"], "cow");

    let brie = &body["recommendations"][0];
    assert_eq!(brie["url"], "/cheese/brie");
    assert_eq!(brie["attributes"]["texture"], "creamy, soft");
    assert!(brie["similarity"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_recommend_without_preferences_skips_unknown_cheeses() {
    let server = create_test_server();

    let response = server.post("/recommend").json(&json!({})).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(names(&body), vec!["Brie", "Cheddar", "Chevre"]);
}

#[tokio::test]
async fn test_recommend_with_unmatched_milk_is_empty() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({ "milk": "buffalo" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_group_by_texture() {
    let server = create_test_server();

    let response = server
        .post("/group")
        .json(&json!({ "attribute": "texture" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["attribute"], "texture");
    assert_eq!(body["groupedCheeses"]["creamy"], json!(["Brie", "Chevre"]));
    assert_eq!(body["groupedCheeses"]["crumbly"], json!(["Cheddar"]));
    assert!(body["groupedCheeses"].get("Unknown").is_none());
}

#[tokio::test]
async fn test_group_requires_attribute() {
    let server = create_test_server();

    let response = server.post("/group").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "Attribute is required");
}

#[tokio::test]
async fn test_group_unknown_attribute() {
    let server = create_test_server();

    let response = server
        .post("/group")
        .json(&json!({ "attribute": "nonexistent" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Attribute 'nonexistent' not found in the dataset."
    );
}

#[tokio::test]
async fn test_get_cheese_by_slug() {
    let server = create_test_server();

    let response = server.get("/cheese/chevre").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Chevre");
    assert_eq!(body["attributes"]["rind"], "Unknown");

    let response = server.get("/cheese/gouda").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_cheese_url() {
    let server = create_test_server();

    let response = server
        .post("/generate-cheese-url")
        .json(&json!({ "cheeseName": "Pont l'Eveque" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["url"], "/cheese/pont-l'eveque");

    let response = server
        .post("/generate-cheese-url")
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let server = create_test_server();

    let response = server
        .post("/register")
        .json(&json!({ "username": "ann", "password": "brie" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = server
        .post("/register")
        .json(&json!({ "username": "ann", "password": "other" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let response = server
        .post("/login")
        .json(&json!({ "username": "ann", "password": "brie" }))
        .await;
    response.assert_status_ok();

    let response = server
        .post("/login")
        .json(&json!({ "username": "ann", "password": "gouda" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_requires_credentials() {
    let server = create_test_server();

    let response = server
        .post("/register")
        .json(&json!({ "username": "ann" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
