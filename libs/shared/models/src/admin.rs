use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by the signed admin session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub iat: Option<u64>,
    pub exp: Option<u64>,
}

/// An authenticated admin session, injected into request extensions by the
/// admin middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    pub email: String,
    pub issued_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub logged_in: bool,
    pub email: String,
}
