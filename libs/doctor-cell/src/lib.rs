use std::sync::Arc;

use shared_config::AppConfig;

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::{DoctorDirectoryService, DoctorRosterService, LeaveService};

/// Per-cell state shared across doctor handlers. The directory is injected
/// so the booking cell can share the same cache instance.
pub struct DoctorCellState {
    pub config: Arc<AppConfig>,
    pub directory: Arc<DoctorDirectoryService>,
    pub roster: DoctorRosterService,
    pub leave: LeaveService,
}

impl DoctorCellState {
    pub fn new(config: Arc<AppConfig>, directory: Arc<DoctorDirectoryService>) -> Self {
        Self {
            roster: DoctorRosterService::new(&config),
            leave: LeaveService::new(&config),
            config,
            directory,
        }
    }
}
