//! Handler coverage for login and the refresh-token endpoints.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test;
use chrono::TimeDelta;
use rstest::rstest;
use serde_json::json;

use crate::domain::{LOGIN_REJECTED, LoginCredentials};
use crate::inbound::http::test_utils::{error_code, init_api, read_json};
use crate::test_support::InMemoryBackend;

const EMAIL: &str = "cook@example.com";
const PASSWORD: &str = "correct horse";

async fn backend_with_account() -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    let credentials = LoginCredentials::try_from_parts(EMAIL, PASSWORD).expect("credentials");
    backend
        .http_state()
        .accounts
        .register(credentials)
        .await
        .expect("register");
    backend
}

async fn login_refresh_token(backend: &InMemoryBackend) -> String {
    let app = init_api(backend).await;
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": EMAIL, "password": PASSWORD }))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    body["refresh_token"]
        .as_str()
        .expect("refresh token")
        .to_owned()
}

#[actix_web::test]
async fn login_returns_both_tokens() {
    let backend = backend_with_account().await;
    let app = init_api(&backend).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": EMAIL, "password": PASSWORD }))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], EMAIL);
    assert!(body["id"].as_str().is_some());
    assert!(body["token"].as_str().is_some_and(|token| !token.is_empty()));
    let refresh = body["refresh_token"].as_str().expect("refresh token");
    let stored = backend.refresh_tokens.get(refresh).expect("persisted");
    assert!(!stored.revoked);
}

#[rstest]
#[case(EMAIL, "wrong password")]
#[case("nobody@example.com", PASSWORD)]
#[case(EMAIL, "short")]
#[case("not-an-email", PASSWORD)]
#[actix_web::test]
async fn failed_logins_share_one_message(#[case] email: &str, #[case] password: &str) {
    let backend = backend_with_account().await;
    let app = init_api(&backend).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], LOGIN_REJECTED);
    // Only the token minted at registration.
    assert_eq!(backend.refresh_tokens.len(), 1);
}

#[actix_web::test]
async fn refresh_mints_a_new_access_token() {
    let backend = backend_with_account().await;
    let refresh = login_refresh_token(&backend).await;
    let app = init_api(&backend).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .insert_header((AUTHORIZATION, format!("Bearer {refresh}")))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
}

#[actix_web::test]
async fn unknown_refresh_token_is_not_found() {
    let backend = backend_with_account().await;
    let app = init_api(&backend).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .insert_header((AUTHORIZATION, "Bearer bm90LWlzc3VlZA=="))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), Some("not_found"));
}

#[actix_web::test]
async fn expired_refresh_token_is_revoked_on_presentation() {
    let backend = backend_with_account().await;
    let refresh = login_refresh_token(&backend).await;
    backend.clock.advance(TimeDelta::days(61));
    let app = init_api(&backend).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .insert_header((AUTHORIZATION, format!("Bearer {refresh}")))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), Some("token_invalid"));
    assert!(backend.refresh_tokens.get(&refresh).expect("stored").revoked);
}

#[actix_web::test]
async fn revoked_refresh_token_can_no_longer_refresh() {
    let backend = backend_with_account().await;
    let refresh = login_refresh_token(&backend).await;
    let app = init_api(&backend).await;
    let bearer = format!("Bearer {refresh}");

    let revoke = test::TestRequest::post()
        .uri("/api/v1/auth/revoke")
        .insert_header((AUTHORIZATION, bearer.clone()))
        .to_request();
    let res = test::call_service(&app, revoke).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let refresh_req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .insert_header((AUTHORIZATION, bearer))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, refresh_req).await).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), Some("token_invalid"));
}

#[actix_web::test]
async fn revoking_an_unknown_token_succeeds() {
    let backend = InMemoryBackend::new();
    let app = init_api(&backend).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/revoke")
        .insert_header((AUTHORIZATION, "Bearer bm90LWlzc3VlZA=="))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn refresh_without_a_token_is_unauthorised() {
    let backend = InMemoryBackend::new();
    let app = init_api(&backend).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
