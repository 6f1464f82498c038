use std::sync::Arc;

use doctor_cell::services::DoctorDirectoryService;
use shared_config::AppConfig;

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::{BookingService, CleanupService};

/// Per-cell state for booking handlers. The doctor directory is the same
/// cached instance the doctor cell serves from.
pub struct BookingCellState {
    pub config: Arc<AppConfig>,
    pub booking: BookingService,
}

impl BookingCellState {
    pub fn new(config: Arc<AppConfig>, directory: Arc<DoctorDirectoryService>) -> Self {
        Self {
            booking: BookingService::new(&config, directory),
            config,
        }
    }
}
