use std::sync::Arc;

use shared_config::AppConfig;

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::{BrevoClient, OtpService};

/// Per-cell state for the admin gate: pending login codes live here for the
/// lifetime of the process.
pub struct AuthCellState {
    pub config: Arc<AppConfig>,
    pub otp: OtpService,
    pub mailer: BrevoClient,
}

impl AuthCellState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            otp: OtpService::new(),
            mailer: BrevoClient::new(&config),
            config,
        }
    }
}
