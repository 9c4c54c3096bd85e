//! Tests for session resolution and the identity extractors

use super::{CurrentUser, OptionalUser};
use crate::auth::session::AuthError;
use crate::{AppState, WebConfig};
use axum::extract::FromRequestParts;
use axum::http::Request;
use voluntree_core::SessionUser;

fn sample_user() -> SessionUser {
    SessionUser {
        id: "user-1".to_string(),
        email: "ada@example.com".to_string(),
        full_name: Some("Ada Lovelace".to_string()),
    }
}

async fn test_state() -> AppState {
    AppState::new(WebConfig::default()).await.unwrap()
}

fn parts_with_cookie(cookie: Option<&str>) -> axum::http::request::Parts {
    let mut builder = Request::builder().uri("/api/auth/me");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    let (parts, ()) = builder.body(()).unwrap().into_parts();
    parts
}

#[tokio::test]
async fn current_user_resolves_valid_cookie() {
    let state = test_state().await;
    let token = state.keys.encode(&sample_user()).unwrap();
    let mut parts = parts_with_cookie(Some(&format!("session={token}")));

    let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();

    assert_eq!(user, sample_user());
}

#[tokio::test]
async fn current_user_rejects_missing_cookie() {
    let state = test_state().await;
    let mut parts = parts_with_cookie(None);

    let err = CurrentUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::NotAuthenticated));
}

#[tokio::test]
async fn tampered_cookie_is_indistinguishable_from_absent() {
    let state = test_state().await;
    let token = state.keys.encode(&sample_user()).unwrap();
    let mut tampered = token;
    tampered.push('x');
    let mut parts = parts_with_cookie(Some(&format!("session={tampered}")));

    let err = CurrentUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();

    // Same rejection as a request with no cookie at all
    assert!(matches!(err, AuthError::NotAuthenticated));
}

#[tokio::test]
async fn garbage_cookie_is_indistinguishable_from_absent() {
    let state = test_state().await;
    let mut parts = parts_with_cookie(Some("session=not-a-token"));

    let err = CurrentUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::NotAuthenticated));
}

#[tokio::test]
async fn optional_user_is_none_for_anonymous() {
    let state = test_state().await;
    let mut parts = parts_with_cookie(None);

    let OptionalUser(user) = OptionalUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();

    assert!(user.is_none());
}

#[tokio::test]
async fn optional_user_carries_identity_when_present() {
    let state = test_state().await;
    let token = state.keys.encode(&sample_user()).unwrap();
    let mut parts = parts_with_cookie(Some(&format!("session={token}")));

    let OptionalUser(user) = OptionalUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();

    assert_eq!(user, Some(sample_user()));
}
