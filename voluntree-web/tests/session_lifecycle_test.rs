//! Session lifecycle integration tests
//!
//! Drives the real router: signup and login issue the session cookie, the
//! cookie authenticates later requests, logout deletes it, and a stale token
//! is treated as anonymous.

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

/// Pull the `session=...` pair out of the response's Set-Cookie header
fn session_cookie(response: &axum::response::Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should set the session cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("session="));
    set_cookie.split(';').next().unwrap().to_string()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn signup_issues_cookie_that_authenticates_me() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/signup",
            Some(json!({
                "email": "ada@example.com",
                "password": "hunter22",
                "full_name": "Ada Lovelace"
            })),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);

    let body = json_body(response).await;
    assert_eq!(body["user"]["email"], "ada@example.com");
    // The token travels only in the cookie, never in the body
    assert!(body.get("token").is_none());

    let response = app
        .clone()
        .oneshot(request("GET", "/api/auth/me", None, Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["full_name"], "Ada Lovelace");
}

#[tokio::test]
async fn login_verifies_credentials() {
    let app = test_app().await;

    app.clone()
        .oneshot(request(
            "POST",
            "/api/auth/signup",
            Some(json!({ "email": "ada@example.com", "password": "hunter22" })),
            None,
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@example.com", "password": "hunter22" })),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response);
}

#[tokio::test]
async fn duplicate_email_signup_is_rejected() {
    let app = test_app().await;
    let signup = json!({ "email": "ada@example.com", "password": "hunter22" });

    let response = app
        .clone()
        .oneshot(request("POST", "/api/auth/signup", Some(signup.clone()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request("POST", "/api/auth/signup", Some(signup), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "email_taken");
}

#[tokio::test]
async fn logout_deletes_the_cookie() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request("POST", "/api/auth/logout", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    // Removal cookie: empty value, expired
    assert!(set_cookie.starts_with("session=;"));
}

#[tokio::test]
async fn expired_token_is_treated_as_anonymous() {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let config = WebConfig::default();
    let secret = config.session_secret.clone();
    let state = AppState::new(config).await.unwrap();
    let app = create_app(state);

    // Sign claims with the server's own secret but an expiry in the past,
    // beyond the validator's leeway
    let now = chrono::Utc::now();
    let claims = voluntree_web::auth::session::Claims {
        sub: "user-1".to_string(),
        email: "ada@example.com".to_string(),
        name: None,
        iat: (now - chrono::Duration::days(8)).timestamp(),
        exp: (now - chrono::Duration::days(1)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();

    let response = app
        .oneshot(request(
            "GET",
            "/api/auth/me",
            None,
            Some(&format!("session={token}")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "not_authenticated");
}
