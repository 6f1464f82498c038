use std::sync::Arc;

use serde_json::json;

use shared_config::AppConfig;

use crate::token::issue_admin_token;

pub struct TestConfig {
    pub admin_email: String,
    pub admin_token_secret: String,
    pub sheets_api_base_url: String,
    pub main_spreadsheet_id: String,
    pub brevo_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@example.com".to_string(),
            admin_token_secret: "test-secret-key-for-token-validation-must-be-long-enough"
                .to_string(),
            sheets_api_base_url: "http://localhost:8081".to_string(),
            main_spreadsheet_id: "main-spreadsheet".to_string(),
            brevo_base_url: "http://localhost:8082".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_sheets_url(mut self, url: &str) -> Self {
        self.sheets_api_base_url = url.to_string();
        self
    }

    pub fn with_brevo_url(mut self, url: &str) -> Self {
        self.brevo_base_url = url.to_string();
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            sheets_api_base_url: self.sheets_api_base_url.clone(),
            sheets_api_token: "test-sheets-token".to_string(),
            main_spreadsheet_id: self.main_spreadsheet_id.clone(),
            admin_email: self.admin_email.clone(),
            admin_token_secret: self.admin_token_secret.clone(),
            brevo_api_key: "test-brevo-key".to_string(),
            brevo_base_url: self.brevo_base_url.clone(),
            mail_sender_email: "noreply@example.com".to_string(),
            cloudinary_base_url: "http://localhost:8083".to_string(),
            cloudinary_cloud_name: "test-cloud".to_string(),
            cloudinary_api_key: "test-cloudinary-key".to_string(),
            cloudinary_api_secret: "test-cloudinary-secret".to_string(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct AdminTokenTestUtils;

impl AdminTokenTestUtils {
    pub fn create_test_token(email: &str, secret: &str) -> String {
        issue_admin_token(email, secret, 24).expect("failed to issue test token")
    }

    pub fn create_expired_token(email: &str, secret: &str) -> String {
        issue_admin_token(email, secret, -1).expect("failed to issue test token")
    }

    pub fn create_invalid_signature_token(email: &str) -> String {
        issue_admin_token(email, "wrong-secret", 24).expect("failed to issue test token")
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned spreadsheet API bodies for wiremock-backed tests.
pub struct MockSheetResponses;

impl MockSheetResponses {
    pub fn value_range(rows: Vec<Vec<&str>>) -> serde_json::Value {
        json!({
            "majorDimension": "ROWS",
            "values": rows
        })
    }

    pub fn empty_value_range() -> serde_json::Value {
        json!({ "majorDimension": "ROWS" })
    }

    pub fn doctors_values() -> serde_json::Value {
        Self::value_range(vec![
            vec![
                "No", "Name", "Specialization", "Days", "MondayTime", "TuesdayTime",
                "WednesdayTime", "ThursdayTime", "FridayTime", "SaturdayTime",
                "SundayTime", "SheetTitle", "SheetURL", "Image",
            ],
            vec![
                "1", "Asha Rao", "Cardiology", "Monday, Wednesday", "09:00-11:00", "",
                "10:00-12:00", "", "", "", "", "Asha_Rao_Cardiology",
                "https://docs.google.com/spreadsheets/d/asha-sheet", "",
            ],
            vec![
                "2", "Vikram Shah", "Cardiology", "Monday, Friday", "14:00-16:00", "",
                "", "", "15:00-17:00", "", "", "Vikram_Shah_Cardiology",
                "https://docs.google.com/spreadsheets/d/vikram-sheet", "",
            ],
        ])
    }

    pub fn sheet_list(titles: Vec<(&str, i64)>) -> serde_json::Value {
        let sheets: Vec<serde_json::Value> = titles
            .into_iter()
            .map(|(title, sheet_id)| {
                json!({ "properties": { "sheetId": sheet_id, "title": title } })
            })
            .collect();
        json!({ "sheets": sheets })
    }

    pub fn created_spreadsheet(id: &str) -> serde_json::Value {
        json!({
            "spreadsheetId": id,
            "spreadsheetUrl": format!("https://docs.google.com/spreadsheets/d/{}", id)
        })
    }
}
