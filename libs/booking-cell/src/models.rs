use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Booking for a specific doctor, addressed by the sheet URL stored in the
/// `Doctors` tab. The wire name `sheetname` is what clients already send.
#[derive(Debug, Clone, Deserialize)]
pub struct BookDoctorRequest {
    #[serde(rename = "sheetname")]
    pub sheet_url: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub phone_number: String,
    pub date: String,
}

/// Booking against a department: the least-loaded doctor of the
/// specialization is picked unless a sheet URL narrows the choice.
#[derive(Debug, Clone, Deserialize)]
pub struct BookDepartmentRequest {
    pub specialization: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub phone_number: String,
    pub date: String,
    #[serde(default)]
    pub doctor_sheet_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PatientDetails {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub phone_number: String,
}

impl PatientDetails {
    pub fn row(&self, token: usize, date: &str) -> Vec<String> {
        vec![
            token.to_string(),
            self.name.clone(),
            self.age.clone(),
            self.gender.clone(),
            self.phone_number.clone(),
            date.to_string(),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub success: bool,
    pub token: usize,
    pub doctor: String,
    pub specialization: String,
    pub date: String,
    pub time: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub phone_number: String,
    pub redirect: String,
}

impl BookingConfirmation {
    pub fn new(
        token: usize,
        doctor: &str,
        specialization: &str,
        date: &str,
        time: &str,
        patient: &PatientDetails,
    ) -> Self {
        let redirect = confirmation_redirect(&[
            ("token", &token.to_string()),
            ("doctor", doctor),
            ("specialization", specialization),
            ("date", date),
            ("time", time),
            ("name", &patient.name),
            ("age", &patient.age),
            ("phone", &patient.phone_number),
        ]);

        Self {
            success: true,
            token,
            doctor: doctor.to_string(),
            specialization: specialization.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            name: patient.name.clone(),
            age: patient.age.clone(),
            gender: patient.gender.clone(),
            phone_number: patient.phone_number.clone(),
            redirect,
        }
    }
}

/// Relative confirmation URL with percent-encoded query parameters.
pub fn confirmation_redirect(params: &[(&str, &str)]) -> String {
    match reqwest::Url::parse_with_params("http://localhost/bookings/confirmation", params) {
        Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
        Err(_) => "/bookings/confirmation".to_string(),
    }
}

/// Query parameters echoed back by the confirmation endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfirmationQuery {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub doctor: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    ValidationError(String),

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_redirect_encodes_params() {
        let redirect = confirmation_redirect(&[
            ("token", "3"),
            ("doctor", "Asha Rao"),
            ("date", "2026-03-02"),
        ]);

        assert!(redirect.starts_with("/bookings/confirmation?"));
        assert!(redirect.contains("token=3"));
        assert!(redirect.contains("doctor=Asha+Rao") || redirect.contains("doctor=Asha%20Rao"));
    }

    #[test]
    fn test_patient_row_layout() {
        let patient = PatientDetails {
            name: "Ravi".to_string(),
            age: "34".to_string(),
            gender: "Male".to_string(),
            phone_number: "9876543210".to_string(),
        };

        assert_eq!(
            patient.row(2, "2026-03-02"),
            vec!["2", "Ravi", "34", "Male", "9876543210", "2026-03-02"]
        );
    }
}
