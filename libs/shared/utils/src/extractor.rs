use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::token::validate_admin_token;

/// Middleware guarding admin-only routes. Validates the bearer token and
/// checks it belongs to the configured admin before letting the request
/// through.
pub async fn admin_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    let token = &auth_value[7..];

    let session = validate_admin_token(token, &config.admin_token_secret)
        .map_err(AppError::Auth)?;

    // Single-admin deployment: the token subject must match ADMIN_EMAIL.
    if !session.email.eq_ignore_ascii_case(&config.admin_email) {
        return Err(AppError::Auth("Unauthorized email.".to_string()));
    }

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
