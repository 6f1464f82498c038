use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{
    AddDoctorRequest, AddLeaveRequest, DeleteDoctorRequest, DeleteLeaveRequest, Doctor,
    DoctorError, EditDoctorRequest, parse_combined,
};
use crate::DoctorCellState;

#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    pub date: NaiveDate,
    pub specialization: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeaveQuery {
    pub combined: String,
}

fn map_doctor_error(e: DoctorError) -> AppError {
    match e {
        DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
        DoctorError::Duplicate(msg) => AppError::Conflict(msg),
        DoctorError::ValidationError(msg) => AppError::BadRequest(msg),
        DoctorError::Upstream(e) => AppError::ExternalService(e.to_string()),
    }
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<DoctorCellState>>) -> Json<Vec<Doctor>> {
    Json(state.directory.list_doctors().await)
}

#[axum::debug_handler]
pub async fn get_specializations(State(state): State<Arc<DoctorCellState>>) -> Json<Vec<String>> {
    Json(state.directory.specializations().await)
}

#[axum::debug_handler]
pub async fn get_doctor_pairs(State(state): State<Arc<DoctorCellState>>) -> Json<Vec<String>> {
    Json(state.directory.doctor_pairs().await)
}

#[axum::debug_handler]
pub async fn doctors_available(
    State(state): State<Arc<DoctorCellState>>,
    Query(query): Query<AvailableQuery>,
) -> Json<Value> {
    let doctors = state
        .directory
        .available_on(query.date, query.specialization.as_deref().map(str::trim))
        .await;

    Json(json!({
        "date": query.date,
        "doctors": doctors,
        "total": doctors.len()
    }))
}

// ==============================================================================
// ADMIN ROSTER HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn add_doctor(
    State(state): State<Arc<DoctorCellState>>,
    Json(request): Json<AddDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let has_image = request
        .image
        .as_deref()
        .is_some_and(|data| !data.trim().is_empty());
    if has_image && !state.config.is_image_upload_configured() {
        return Err(AppError::Internal("Image upload service not configured.".to_string()));
    }

    state.roster.add_doctor(request).await.map_err(map_doctor_error)?;
    state.directory.invalidate().await;

    Ok(Json(json!({ "success": true, "msg": "Doctor added successfully" })))
}

#[axum::debug_handler]
pub async fn edit_doctor(
    State(state): State<Arc<DoctorCellState>>,
    Json(request): Json<EditDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    state.roster.edit_doctor(request).await.map_err(map_doctor_error)?;
    state.directory.invalidate().await;

    Ok(Json(json!({ "success": true, "msg": "Doctor updated successfully" })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<DoctorCellState>>,
    Json(request): Json<DeleteDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .roster
        .delete_doctor(&request.combined)
        .await
        .map_err(map_doctor_error)?;
    state.directory.invalidate().await;

    Ok(Json(json!({ "success": true, "msg": "Doctor deleted successfully" })))
}

// ==============================================================================
// ADMIN LEAVE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_leaves(
    State(state): State<Arc<DoctorCellState>>,
    Query(query): Query<LeaveQuery>,
) -> Result<Json<Value>, AppError> {
    let (name, specialization) = parse_combined(&query.combined)
        .ok_or_else(|| AppError::BadRequest("Invalid doctor".to_string()))?;

    let leaves = state
        .leave
        .leaves_for(&name, &specialization)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    Ok(Json(json!({ "success": true, "leaves": leaves })))
}

#[axum::debug_handler]
pub async fn add_leave(
    State(state): State<Arc<DoctorCellState>>,
    Json(request): Json<AddLeaveRequest>,
) -> Result<Json<Value>, AppError> {
    if request.combined.trim().is_empty() || request.date.trim().is_empty() {
        return Err(AppError::BadRequest("Missing doctor or date".to_string()));
    }
    let (name, specialization) = parse_combined(&request.combined)
        .ok_or_else(|| AppError::BadRequest("Invalid doctor format".to_string()))?;

    state
        .leave
        .add(&name, &specialization, request.date.trim(), request.reason.trim())
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({ "success": true, "msg": "Leave added successfully." })))
}

#[axum::debug_handler]
pub async fn delete_leave(
    State(state): State<Arc<DoctorCellState>>,
    Json(request): Json<DeleteLeaveRequest>,
) -> Result<Json<Value>, AppError> {
    if request.date.trim().is_empty() {
        return Err(AppError::BadRequest("Missing or invalid doctor/date".to_string()));
    }
    let (name, specialization) = parse_combined(&request.combined)
        .ok_or_else(|| AppError::BadRequest("Missing or invalid doctor/date".to_string()))?;

    state
        .leave
        .remove(&name, &specialization, request.date.trim())
        .await
        .map_err(|e| match e {
            DoctorError::NotFound => {
                AppError::NotFound("No matching leave entry found.".to_string())
            }
            other => map_doctor_error(other),
        })?;

    Ok(Json(json!({ "success": true, "msg": "Leave entry removed." })))
}
