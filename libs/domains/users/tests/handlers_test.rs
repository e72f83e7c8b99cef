//! Handler tests for the users domain.
//!
//! These drive the routekit router end-to-end: request deserialization,
//! status codes, response shapes and the error envelope, without opening
//! sockets.

use std::sync::Arc;

use bytes::Bytes;
use domain_users::{InMemoryUserRepository, UserService, handlers};
use http::{Request, StatusCode};
use http_body_util::{BodyExt, Full};
use routekit::Router;
use serde_json::{Value, json};

fn app() -> Router {
    let service = Arc::new(UserService::new(InMemoryUserRepository::new()));
    let mut router = Router::new();
    router.apply(routekit::middleware::recover());
    handlers::register(&mut router, "/api/v1/users", service);
    router
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Full<Bytes>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

async fn json_body(response: http::Response<Full<Bytes>>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_user_returns_201_with_representation() {
    let app = app();

    let response = app
        .dispatch(json_request(
            "POST",
            "/api/v1/users",
            &json!({"name": "Alice", "email": "alice@example.com"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let user = json_body(response).await;
    assert_ne!(user["id"], "");
    assert_eq!(user["name"], "Alice");
    assert_eq!(user["email"], "alice@example.com");
    assert!(user.get("createdAt").is_some());
    assert!(user.get("updatedAt").is_some());
    assert!(user.get("phone").is_none());
}

#[tokio::test]
async fn test_create_user_with_empty_body_returns_400_envelope() {
    let app = app();

    let response = app
        .dispatch(json_request("POST", "/api/v1/users", &json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let envelope = json_body(response).await;
    assert!(!envelope["error"].is_null());
    assert_eq!(envelope["status"], 400);
    assert_eq!(envelope["request"], "/api/v1/users");
}

#[tokio::test]
async fn test_create_user_with_malformed_json_returns_400() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/users")
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from_static(b"{not json")))
        .unwrap();

    let response = app.dispatch(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let envelope = json_body(response).await;
    assert_eq!(envelope["error"], "invalid request payload");
}

#[tokio::test]
async fn test_create_user_validation_failures_return_400() {
    let app = app();

    let cases = [
        json!({"name": "", "email": "alice@example.com"}),
        json!({"name": "A", "email": "alice@example.com"}),
        json!({"name": "Alice", "email": "not-an-email"}),
        json!({"name": "Alice", "email": "alice@example.com", "phone": "abc"}),
    ];

    for body in cases {
        let response = app.dispatch(json_request("POST", "/api/v1/users", &body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }
}

#[tokio::test]
async fn test_create_duplicate_email_returns_409() {
    let app = app();

    let body = json!({"name": "Alice", "email": "alice@example.com"});
    let response = app.dispatch(json_request("POST", "/api/v1/users", &body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let again = json!({"name": "Other", "email": "ALICE@example.com"});
    let response = app.dispatch(json_request("POST", "/api/v1/users", &again)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let envelope = json_body(response).await;
    assert_eq!(envelope["error"], "user already exists");
}

#[tokio::test]
async fn test_get_unknown_user_returns_404() {
    let app = app();

    let response = app.dispatch(empty_request("GET", "/api/v1/users/999")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let envelope = json_body(response).await;
    assert_eq!(envelope["error"], "user not found");
    assert_eq!(envelope["status"], 404);
    assert_eq!(envelope["request"], "/api/v1/users/999");
}

#[tokio::test]
async fn test_update_with_empty_patch_returns_400() {
    let app = app();

    let response = app
        .dispatch(json_request(
            "POST",
            "/api/v1/users",
            &json!({"name": "Alice", "email": "alice@example.com"}),
        ))
        .await;
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .dispatch(json_request(
            "PUT",
            &format!("/api/v1/users/{}", id),
            &json!({}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let envelope = json_body(response).await;
    assert_eq!(envelope["error"], "no update data provided");
}

#[tokio::test]
async fn test_update_unknown_user_returns_404() {
    let app = app();

    let response = app
        .dispatch(json_request(
            "PUT",
            "/api/v1/users/999",
            &json!({"name": "Nobody"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_user_returns_404() {
    let app = app();

    let response = app
        .dispatch(empty_request("DELETE", "/api/v1/users/999"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_crud_scenario() {
    let app = app();

    // Create.
    let response = app
        .dispatch(json_request(
            "POST",
            "/api/v1/users",
            &json!({"name": "Alice", "email": "alice@example.com"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    // List shows exactly Alice.
    let response = app.dispatch(empty_request("GET", "/api/v1/users")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = json_body(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Alice");

    // Patch the email; the name stays.
    let response = app
        .dispatch(json_request(
            "PUT",
            &format!("/api/v1/users/{}", id),
            &json!({"email": "alice@new.com"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await;
    assert_eq!(updated["email"], "alice@new.com");
    assert_eq!(updated["name"], "Alice");

    // Delete.
    let response = app
        .dispatch(empty_request("DELETE", &format!("/api/v1/users/{}", id)))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone.
    let response = app
        .dispatch(empty_request("GET", &format!("/api/v1/users/{}", id)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_created_user_round_trips_by_id() {
    let app = app();

    let response = app
        .dispatch(json_request(
            "POST",
            "/api/v1/users",
            &json!({
                "name": "Alice",
                "email": "alice@example.com",
                "phone": "+55 11 91234-5678",
                "address": "12 Main St"
            }),
        ))
        .await;
    let created = json_body(response).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .dispatch(empty_request("GET", &format!("/api/v1/users/{}", id)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched = json_body(response).await;
    assert_eq!(fetched, created);
    assert_eq!(fetched["phone"], "+5511912345678");
}

#[tokio::test]
async fn test_list_is_sorted_by_creation_time() {
    let app = app();

    for (name, email) in [
        ("First User", "first@example.com"),
        ("Second User", "second@example.com"),
        ("Third User", "third@example.com"),
    ] {
        let response = app
            .dispatch(json_request(
                "POST",
                "/api/v1/users",
                &json!({"name": name, "email": email}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let response = app.dispatch(empty_request("GET", "/api/v1/users")).await;
    let list = json_body(response).await;
    let emails: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(
        emails,
        vec!["first@example.com", "second@example.com", "third@example.com"]
    );
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = app();

    let response = app.dispatch(empty_request("GET", "/api/v2/users")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let envelope = json_body(response).await;
    assert_eq!(envelope["status"], 404);
    assert_eq!(envelope["request"], "/api/v2/users");
}
