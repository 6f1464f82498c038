use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error};

use shared_config::AppConfig;

const SENDER_NAME: &str = "PrimeCare";
const OTP_SUBJECT: &str = "Your PrimeCare Admin Login Code";

/// Transactional email client for a Brevo-style API.
pub struct BrevoClient {
    client: Client,
    base_url: String,
    api_key: String,
    sender_email: String,
}

impl BrevoClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.brevo_base_url.clone(),
            api_key: config.brevo_api_key.clone(),
            sender_email: config.mail_sender_email.clone(),
        }
    }

    pub async fn send_otp_email(&self, recipient: &str, code: &str) -> Result<()> {
        debug!("Sending login code email to {}", recipient);

        let body = json!({
            "sender": { "name": SENDER_NAME, "email": self.sender_email },
            "to": [{ "email": recipient }],
            "subject": OTP_SUBJECT,
            "htmlContent": format!(
                "<p>Your one-time login code is <strong>{}</strong>.</p>\
                 <p>It expires in 10 minutes. If you did not request it, ignore this email.</p>",
                code
            ),
            "textContent": format!(
                "Your one-time login code is {}. It expires in 10 minutes.",
                code
            ),
        });

        let url = format!("{}/v3/smtp/email", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Email send failed ({}): {}", status, error_text);
            return Err(anyhow!("Email send failed ({}): {}", status, error_text));
        }
        Ok(())
    }
}
