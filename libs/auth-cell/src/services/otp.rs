use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

const OTP_TTL_MINUTES: i64 = 10;

#[derive(Error, Debug, PartialEq)]
pub enum OtpError {
    #[error("No login code is pending for this email.")]
    NoPending,

    #[error("The code has expired. Please request a new one.")]
    Expired,

    #[error("Incorrect code.")]
    Mismatch,
}

struct PendingCode {
    code: String,
    issued_at: DateTime<Utc>,
}

/// In-memory store of pending one-time login codes, keyed by lowercased
/// email. Codes are single-use and expire after ten minutes.
#[derive(Default)]
pub struct OtpService {
    pending: RwLock<HashMap<String, PendingCode>>,
}

impl OtpService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate and store a fresh 6-digit code, replacing any pending one.
    pub async fn issue(&self, email: &str) -> String {
        let code = {
            let mut rng = rand::thread_rng();
            rng.gen_range(100_000..=999_999).to_string()
        };

        let mut pending = self.pending.write().await;
        pending.insert(
            email.trim().to_lowercase(),
            PendingCode {
                code: code.clone(),
                issued_at: Utc::now(),
            },
        );
        debug!("Issued login code for {}", email);
        code
    }

    /// Check a code against the pending entry. A correct code consumes the
    /// entry; an expired one is discarded.
    pub async fn verify(&self, email: &str, code: &str) -> Result<(), OtpError> {
        self.verify_at(email, code, Utc::now()).await
    }

    async fn verify_at(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), OtpError> {
        let key = email.trim().to_lowercase();
        let mut pending = self.pending.write().await;

        let entry = pending.get(&key).ok_or(OtpError::NoPending)?;
        if now - entry.issued_at > Duration::minutes(OTP_TTL_MINUTES) {
            pending.remove(&key);
            return Err(OtpError::Expired);
        }
        if entry.code != code.trim() {
            return Err(OtpError::Mismatch);
        }

        pending.remove(&key);
        Ok(())
    }

    /// Drop any pending code for the email.
    pub async fn clear(&self, email: &str) {
        let mut pending = self.pending.write().await;
        pending.remove(&email.trim().to_lowercase());
    }
}
