use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{
    BookDepartmentRequest, BookDoctorRequest, BookingConfirmation, BookingError, ConfirmationQuery,
};
use crate::BookingCellState;

fn map_booking_error(e: BookingError) -> AppError {
    match e {
        BookingError::NotFound(msg) => AppError::NotFound(msg),
        BookingError::Unavailable(msg) => AppError::Conflict(msg),
        BookingError::ValidationError(msg) => AppError::BadRequest(msg),
        BookingError::Upstream(e) => AppError::ExternalService(e.to_string()),
    }
}

#[axum::debug_handler]
pub async fn book_doctor(
    State(state): State<Arc<BookingCellState>>,
    Json(request): Json<BookDoctorRequest>,
) -> Result<Json<BookingConfirmation>, AppError> {
    let confirmation = state
        .booking
        .book_direct(request)
        .await
        .map_err(map_booking_error)?;
    Ok(Json(confirmation))
}

#[axum::debug_handler]
pub async fn book_department(
    State(state): State<Arc<BookingCellState>>,
    Json(request): Json<BookDepartmentRequest>,
) -> Result<Json<BookingConfirmation>, AppError> {
    let confirmation = state
        .booking
        .book_department(request)
        .await
        .map_err(map_booking_error)?;
    Ok(Json(confirmation))
}

/// Echo of the booking outcome, addressable via the redirect URL in the
/// booking response.
#[axum::debug_handler]
pub async fn booking_confirmation(Query(query): Query<ConfirmationQuery>) -> Json<Value> {
    Json(json!({
        "success": true,
        "confirmation": query
    }))
}
