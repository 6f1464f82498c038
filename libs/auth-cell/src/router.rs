use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;
use crate::AuthCellState;

pub fn auth_routes(config: Arc<AppConfig>) -> Router {
    let state = Arc::new(AuthCellState::new(config));

    Router::new()
        .route("/otp/send", post(handlers::send_admin_otp))
        .route("/otp/verify", post(handlers::verify_admin_otp))
        .route("/session", get(handlers::check_admin))
        .route("/logout", post(handlers::admin_logout))
        .with_state(state)
}
