use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::HeaderMap,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_models::admin::SessionResponse;
use shared_models::error::AppError;
use shared_utils::token::{issue_admin_token, validate_admin_token};

use crate::models::{LogoutRequest, SendOtpRequest, VerifyOtpRequest};
use crate::AuthCellState;

const ADMIN_TOKEN_HOURS: i64 = 24;

// Helper function to extract token
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_value = headers.get("Authorization")?.to_str().ok()?;
    auth_value.strip_prefix("Bearer ").map(|t| t.to_string())
}

fn is_admin_email(state: &AuthCellState, email: &str) -> bool {
    email.trim().eq_ignore_ascii_case(&state.config.admin_email)
}

#[axum::debug_handler]
pub async fn send_admin_otp(
    State(state): State<Arc<AuthCellState>>,
    Json(request): Json<SendOtpRequest>,
) -> Result<Json<Value>, AppError> {
    if !is_admin_email(&state, &request.email) {
        return Err(AppError::Auth("Unauthorized email.".to_string()));
    }
    if !state.config.is_mail_configured() {
        return Err(AppError::Internal("Email service not configured.".to_string()));
    }

    let code = state.otp.issue(&state.config.admin_email).await;
    state
        .mailer
        .send_otp_email(&state.config.admin_email, &code)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    info!("Login code sent to admin");
    Ok(Json(json!({ "success": true, "msg": "OTP sent." })))
}

#[axum::debug_handler]
pub async fn verify_admin_otp(
    State(state): State<Arc<AuthCellState>>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<Value>, AppError> {
    if !is_admin_email(&state, &request.email) {
        return Err(AppError::Auth("Unauthorized email.".to_string()));
    }

    state
        .otp
        .verify(&state.config.admin_email, &request.code)
        .await
        .map_err(|e| AppError::Auth(e.to_string()))?;

    let token = issue_admin_token(
        &state.config.admin_email,
        &state.config.admin_token_secret,
        ADMIN_TOKEN_HOURS,
    )
    .map_err(AppError::Internal)?;

    info!("Admin session issued");
    Ok(Json(json!({
        "success": true,
        "token": token,
        "email": state.config.admin_email
    })))
}

/// Report whether the presented token is a live admin session. Never errors:
/// a missing or bad token reads as logged out.
#[axum::debug_handler]
pub async fn check_admin(
    State(state): State<Arc<AuthCellState>>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    debug!("Checking admin session");

    let session = extract_bearer_token(&headers)
        .and_then(|token| validate_admin_token(&token, &state.config.admin_token_secret).ok())
        .filter(|session| is_admin_email(&state, &session.email));

    match session {
        Some(session) => Json(SessionResponse {
            logged_in: true,
            email: session.email,
        }),
        None => Json(SessionResponse {
            logged_in: false,
            email: String::new(),
        }),
    }
}

/// Drop any pending login code. Issued tokens are short-lived and discarded
/// client-side.
#[axum::debug_handler]
pub async fn admin_logout(
    State(state): State<Arc<AuthCellState>>,
    Json(request): Json<LogoutRequest>,
) -> Json<Value> {
    if !request.email.trim().is_empty() {
        state.otp.clear(&request.email).await;
    }
    Json(json!({ "success": true, "msg": "Logged out." }))
}
