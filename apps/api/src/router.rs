use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use auth_cell::router::auth_routes;
use booking_cell::router::booking_routes;
use doctor_cell::router::doctor_routes;
use doctor_cell::services::DoctorDirectoryService;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    // One directory cache for both the doctor and booking cells.
    let directory = Arc::new(DoctorDirectoryService::new(&state));

    Router::new()
        .route("/", get(|| async { "PrimeCare booking API is running!" }))
        .nest("/doctors", doctor_routes(state.clone(), directory.clone()))
        .nest("/bookings", booking_routes(state.clone(), directory))
        .nest("/admin", auth_routes(state))
}
