use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sheets_api_base_url: String,
    pub sheets_api_token: String,
    pub main_spreadsheet_id: String,
    pub admin_email: String,
    pub admin_token_secret: String,
    pub brevo_api_key: String,
    pub brevo_base_url: String,
    pub mail_sender_email: String,
    pub cloudinary_base_url: String,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            sheets_api_base_url: env::var("SHEETS_API_BASE_URL")
                .unwrap_or_else(|_| "https://sheets.googleapis.com".to_string()),
            sheets_api_token: env::var("SHEETS_API_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("SHEETS_API_TOKEN not set, using empty value");
                    String::new()
                }),
            main_spreadsheet_id: env::var("MAIN_SPREADSHEET_ID")
                .unwrap_or_else(|_| {
                    warn!("MAIN_SPREADSHEET_ID not set, using empty value");
                    String::new()
                }),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "doctorbooksystem@gmail.com".to_string()),
            admin_token_secret: env::var("ADMIN_TOKEN_SECRET")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_TOKEN_SECRET not set, using empty value");
                    String::new()
                }),
            brevo_api_key: env::var("BREVO_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("BREVO_API_KEY not set, using empty value");
                    String::new()
                }),
            brevo_base_url: env::var("BREVO_BASE_URL")
                .unwrap_or_else(|_| "https://api.brevo.com".to_string()),
            mail_sender_email: env::var("MAIL_SENDER_EMAIL")
                .unwrap_or_else(|_| "doctorbooksystem@gmail.com".to_string()),
            cloudinary_base_url: env::var("CLOUDINARY_BASE_URL")
                .unwrap_or_else(|_| "https://api.cloudinary.com".to_string()),
            cloudinary_cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                .unwrap_or_else(|_| {
                    warn!("CLOUDINARY_CLOUD_NAME not set, using empty value");
                    String::new()
                }),
            cloudinary_api_key: env::var("CLOUDINARY_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("CLOUDINARY_API_KEY not set, using empty value");
                    String::new()
                }),
            cloudinary_api_secret: env::var("CLOUDINARY_API_SECRET")
                .unwrap_or_else(|_| {
                    warn!("CLOUDINARY_API_SECRET not set, using empty value");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.sheets_api_token.is_empty()
            && !self.main_spreadsheet_id.is_empty()
            && !self.admin_token_secret.is_empty()
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.brevo_api_key.is_empty() && !self.mail_sender_email.is_empty()
    }

    pub fn is_image_upload_configured(&self) -> bool {
        !self.cloudinary_cloud_name.is_empty()
            && !self.cloudinary_api_key.is_empty()
            && !self.cloudinary_api_secret.is_empty()
    }
}
