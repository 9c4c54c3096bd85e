//! Profile and host-organization route tests
//!
//! Covers the account-side CRUD: profile upsert and read-back, organization
//! creation, update, and the prerequisite error for updating an organization
//! that was never created.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use voluntree_web::{create_app, AppState, WebConfig};

async fn test_app() -> Router {
    let state = AppState::new(WebConfig::default()).await.unwrap();
    create_app(state)
}

fn request(method: &str, uri: &str, body: Option<Value>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    if let Some(body) = body {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        builder
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn signup(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/signup",
            Some(json!({ "email": email, "password": "hunter22" })),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn profile_round_trips_through_upsert() {
    let app = test_app().await;
    let cookie = signup(&app, "ada@example.com").await;

    // Signup without a display name leaves the profile row name-less
    let response = app
        .clone()
        .oneshot(request("GET", "/api/profile", None, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["profile"]["full_name"].is_null());

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            "/api/profile",
            Some(json!({
                "full_name": "Ada Lovelace",
                "phone": "+44 1234 567890",
                "country": "UK",
                "bio": "Marine conservation volunteer"
            })),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/profile", None, Some(&cookie)))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["profile"]["full_name"], "Ada Lovelace");
    assert_eq!(body["profile"]["country"], "UK");
    assert_eq!(body["profile"]["bio"], "Marine conservation volunteer");

    // The profile name now feeds the "who am I" response
    let response = app
        .clone()
        .oneshot(request("GET", "/api/auth/me", None, Some(&cookie)))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["user"]["full_name"], "Ada Lovelace");
}

#[tokio::test]
async fn anonymous_profile_access_is_rejected() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/profile", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            "/api/profile",
            Some(json!({ "full_name": "Nobody" })),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn organization_is_null_until_created_then_updatable() {
    let app = test_app().await;
    let cookie = signup(&app, "host@example.com").await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/host-organization", None, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["organization"].is_null());

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/host-organization",
            Some(json!({ "name": "Sea Turtle Rescue", "country": "CR" })),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            "/api/host-organization",
            Some(json!({
                "name": "Sea Turtle Rescue International",
                "location": "Tortuguero"
            })),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["organization"]["name"], "Sea Turtle Rescue International");

    let response = app
        .clone()
        .oneshot(request("GET", "/api/host-organization", None, Some(&cookie)))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["organization"]["name"], "Sea Turtle Rescue International");
    assert_eq!(body["organization"]["location"], "Tortuguero");
}

#[tokio::test]
async fn updating_a_never_created_organization_is_a_prerequisite_error() {
    let app = test_app().await;
    let cookie = signup(&app, "orgless@example.com").await;

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            "/api/host-organization",
            Some(json!({ "name": "Ghost Org" })),
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "no_organization");
}
