pub mod mailer;
pub mod otp;

pub use mailer::BrevoClient;
pub use otp::{OtpError, OtpService};
