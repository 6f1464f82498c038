use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_utils::extractor::admin_middleware;

use crate::handlers;
use crate::services::DoctorDirectoryService;
use crate::DoctorCellState;

use shared_config::AppConfig;

pub fn doctor_routes(config: Arc<AppConfig>, directory: Arc<DoctorDirectoryService>) -> Router {
    let state = Arc::new(DoctorCellState::new(config.clone(), directory));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/specializations", get(handlers::get_specializations))
        .route("/pairs", get(handlers::get_doctor_pairs))
        .route("/available", get(handlers::doctors_available));

    // Protected routes (admin token required)
    let protected_routes = Router::new()
        .route("/", post(handlers::add_doctor))
        .route("/", put(handlers::edit_doctor))
        .route("/", delete(handlers::delete_doctor))
        .route("/leaves", get(handlers::get_leaves))
        .route("/leaves", post(handlers::add_leave))
        .route("/leaves", delete(handlers::delete_leave))
        .layer(middleware::from_fn_with_state(config, admin_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
