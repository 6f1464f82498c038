use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, HeaderValue};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::handlers;
use auth_cell::models::{LogoutRequest, SendOtpRequest, VerifyOtpRequest};
use auth_cell::AuthCellState;
use shared_models::error::AppError;
use shared_utils::test_utils::{AdminTokenTestUtils, TestConfig};
use shared_utils::token::validate_admin_token;

fn auth_state(brevo_url: &str) -> Arc<AuthCellState> {
    let config = TestConfig::default().with_brevo_url(brevo_url).to_arc();
    Arc::new(AuthCellState::new(config))
}

fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Authorization",
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

#[tokio::test]
async fn test_send_otp_rejects_unknown_email() {
    let state = auth_state("http://localhost:8082");

    let result = handlers::send_admin_otp(
        State(state),
        Json(SendOtpRequest {
            email: "intruder@example.com".to_string(),
        }),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::Auth(msg) if msg == "Unauthorized email.");
}

#[tokio::test]
async fn test_send_otp_delivers_email() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/smtp/email"))
        .and(header("api-key", "test-brevo-key"))
        .and(body_partial_json(serde_json::json!({
            "to": [{ "email": "admin@example.com" }],
            "subject": "Your PrimeCare Admin Login Code"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "messageId": "m-1" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = auth_state(&mock_server.uri());
    let result = handlers::send_admin_otp(
        State(state),
        Json(SendOtpRequest {
            // Case-insensitive match against the configured admin email.
            email: "Admin@Example.com".to_string(),
        }),
    )
    .await;

    let Json(body) = result.expect("send_admin_otp should succeed");
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_send_otp_mail_failure_surfaces() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/smtp/email"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&mock_server)
        .await;

    let state = auth_state(&mock_server.uri());
    let result = handlers::send_admin_otp(
        State(state),
        Json(SendOtpRequest {
            email: "admin@example.com".to_string(),
        }),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::ExternalService(_));
}

#[tokio::test]
async fn test_verify_otp_issues_admin_token() {
    let state = auth_state("http://localhost:8082");
    let code = state.otp.issue("admin@example.com").await;

    let result = handlers::verify_admin_otp(
        State(state.clone()),
        Json(VerifyOtpRequest {
            email: "admin@example.com".to_string(),
            code,
        }),
    )
    .await;

    let Json(body) = result.expect("verify_admin_otp should succeed");
    assert_eq!(body["success"], true);

    let token = body["token"].as_str().expect("token should be a string");
    let session = validate_admin_token(token, &state.config.admin_token_secret)
        .expect("issued token should validate");
    assert_eq!(session.email, "admin@example.com");
}

#[tokio::test]
async fn test_verify_otp_rejects_wrong_code() {
    let state = auth_state("http://localhost:8082");
    let _ = state.otp.issue("admin@example.com").await;

    let result = handlers::verify_admin_otp(
        State(state),
        Json(VerifyOtpRequest {
            email: "admin@example.com".to_string(),
            code: "000000".to_string(),
        }),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::Auth(msg) if msg.contains("Incorrect"));
}

#[tokio::test]
async fn test_verify_otp_rejects_without_pending_code() {
    let state = auth_state("http://localhost:8082");

    let result = handlers::verify_admin_otp(
        State(state),
        Json(VerifyOtpRequest {
            email: "admin@example.com".to_string(),
            code: "123456".to_string(),
        }),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::Auth(_));
}

#[tokio::test]
async fn test_check_admin_with_valid_token() {
    let state = auth_state("http://localhost:8082");
    let token = AdminTokenTestUtils::create_test_token(
        "admin@example.com",
        &state.config.admin_token_secret,
    );

    let Json(session) = handlers::check_admin(State(state), bearer_headers(&token)).await;

    assert!(session.logged_in);
    assert_eq!(session.email, "admin@example.com");
}

#[tokio::test]
async fn test_check_admin_never_errors() {
    let state = auth_state("http://localhost:8082");

    // No header at all.
    let Json(session) = handlers::check_admin(State(state.clone()), HeaderMap::new()).await;
    assert!(!session.logged_in);

    // Garbage token.
    let Json(session) = handlers::check_admin(
        State(state.clone()),
        bearer_headers(&AdminTokenTestUtils::create_malformed_token()),
    )
    .await;
    assert!(!session.logged_in);

    // Valid signature but not the admin email.
    let other = AdminTokenTestUtils::create_test_token(
        "someone@example.com",
        &state.config.admin_token_secret,
    );
    let Json(session) = handlers::check_admin(State(state), bearer_headers(&other)).await;
    assert!(!session.logged_in);
}

#[tokio::test]
async fn test_logout_clears_pending_code() {
    let state = auth_state("http://localhost:8082");
    let code = state.otp.issue("admin@example.com").await;

    let Json(body) = handlers::admin_logout(
        State(state.clone()),
        Json(LogoutRequest {
            email: "admin@example.com".to_string(),
        }),
    )
    .await;
    assert_eq!(body["success"], true);

    let result = handlers::verify_admin_otp(
        State(state),
        Json(VerifyOtpRequest {
            email: "admin@example.com".to_string(),
            code,
        }),
    )
    .await;
    assert!(result.is_err());
}
