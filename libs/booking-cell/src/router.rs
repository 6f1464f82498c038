use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use doctor_cell::services::DoctorDirectoryService;
use shared_config::AppConfig;

use crate::handlers;
use crate::BookingCellState;

pub fn booking_routes(config: Arc<AppConfig>, directory: Arc<DoctorDirectoryService>) -> Router {
    let state = Arc::new(BookingCellState::new(config, directory));

    Router::new()
        .route("/doctor", post(handlers::book_doctor))
        .route("/department", post(handlers::book_department))
        .route("/confirmation", get(handlers::booking_confirmation))
        .with_state(state)
}
