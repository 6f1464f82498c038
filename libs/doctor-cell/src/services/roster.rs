use anyhow::Result;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_sheets::{records, SheetsClient};

use crate::models::{AddDoctorRequest, DoctorError, EditDoctorRequest, DAY_NAMES};
use crate::services::cloudinary::CloudinaryClient;
use crate::services::directory::DOCTORS_TAB;

pub const DOCTORS_HEADER: [&str; 14] = [
    "No",
    "Name",
    "Specialization",
    "Days",
    "MondayTime",
    "TuesdayTime",
    "WednesdayTime",
    "ThursdayTime",
    "FridayTime",
    "SaturdayTime",
    "SundayTime",
    "SheetTitle",
    "SheetURL",
    "Image",
];

pub const PATIENT_SHEET_HEADER: [&str; 6] =
    ["Token", "Name", "Age", "Gender", "Phone_Number", "Date"];

// Profile photos must be portrait 4:5, e.g. 400x500.
const EXPECTED_ASPECT_RATIO: f64 = 4.0 / 5.0;
const ASPECT_RATIO_TOLERANCE: f64 = 0.02;

/// Admin-side doctor roster management: add, edit and delete rows of the
/// `Doctors` tab, provisioning a per-doctor spreadsheet on add.
pub struct DoctorRosterService {
    sheets: SheetsClient,
    spreadsheet_id: String,
    cloudinary: CloudinaryClient,
}

impl DoctorRosterService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            sheets: SheetsClient::new(config),
            spreadsheet_id: config.main_spreadsheet_id.clone(),
            cloudinary: CloudinaryClient::new(config),
        }
    }

    pub async fn add_doctor(&self, request: AddDoctorRequest) -> Result<(), DoctorError> {
        let name = request.name.trim().to_string();
        let specialization = request.specialization.trim().to_string();
        if name.is_empty()
            || specialization.is_empty()
            || request.days.is_empty()
            || request.day_times.is_empty()
        {
            return Err(DoctorError::ValidationError("Missing fields".to_string()));
        }

        let rows = self
            .sheets
            .get_values(&self.spreadsheet_id, DOCTORS_TAB)
            .await
            .map_err(DoctorError::Upstream)?;

        for rec in records(&rows) {
            let row_name = rec.get("Name").map(|s| s.trim()).unwrap_or_default();
            let row_spec = rec.get("Specialization").map(|s| s.trim()).unwrap_or_default();
            if row_name.eq_ignore_ascii_case(&name) && row_spec.eq_ignore_ascii_case(&specialization)
            {
                return Err(DoctorError::Duplicate(
                    "Doctor already exists with same name and specialization.".to_string(),
                ));
            }
        }

        let image_url = match &request.image {
            Some(data) if !data.trim().is_empty() => {
                self.upload_profile_image(data, &name).await?
            }
            _ => String::new(),
        };

        // Provision the per-doctor spreadsheet that will hold one tab per
        // service date.
        let sheet_title = format!(
            "{}_{}",
            name.replace(' ', "_"),
            specialization.replace(' ', "_")
        );
        let created = self
            .sheets
            .create_spreadsheet(&sheet_title)
            .await
            .map_err(DoctorError::Upstream)?;
        let header: Vec<String> = PATIENT_SHEET_HEADER.iter().map(|s| s.to_string()).collect();
        self.sheets
            .append_row(&created.spreadsheet_id, "Sheet1", &header)
            .await
            .map_err(DoctorError::Upstream)?;
        debug!("Created sheet for {} - {}", name, created.spreadsheet_url);

        // Serial number: header plus existing data rows.
        let next_number = rows.len().max(1);

        let time_for = |day: &str| request.day_times.get(day).cloned().unwrap_or_default();
        let row: Vec<String> = vec![
            next_number.to_string(),
            name,
            specialization,
            request.days.join(", "),
            time_for("Monday"),
            time_for("Tuesday"),
            time_for("Wednesday"),
            time_for("Thursday"),
            time_for("Friday"),
            time_for("Saturday"),
            time_for("Sunday"),
            sheet_title,
            created.spreadsheet_url,
            image_url,
        ];
        self.sheets
            .append_row(&self.spreadsheet_id, DOCTORS_TAB, &row)
            .await
            .map_err(DoctorError::Upstream)?;
        Ok(())
    }

    /// Upload a profile image and enforce the 4:5 portrait ratio. Uploads
    /// that fail the check are deleted from the CDN again.
    async fn upload_profile_image(
        &self,
        file_data: &str,
        doctor_name: &str,
    ) -> Result<String, DoctorError> {
        let public_id = doctor_name.replace(' ', "_");
        let uploaded = self
            .cloudinary
            .upload(file_data, &public_id)
            .await
            .map_err(|e| {
                warn!("Error processing doctor image: {}", e);
                DoctorError::ValidationError(
                    "Image upload failed. Please use a JPG/PNG photo and try again.".to_string(),
                )
            })?;

        if uploaded.height == 0 {
            return Err(DoctorError::ValidationError(
                "Image upload failed. Please use a JPG/PNG photo and try again.".to_string(),
            ));
        }

        let aspect_ratio = uploaded.width as f64 / uploaded.height as f64;
        if (aspect_ratio - EXPECTED_ASPECT_RATIO).abs() > ASPECT_RATIO_TOLERANCE {
            if let Err(e) = self.cloudinary.destroy(&uploaded.public_id).await {
                warn!("Failed to remove rejected image: {}", e);
            }
            return Err(DoctorError::ValidationError(format!(
                "Image must have a 4:5 ratio (e.g. 400x500). Uploaded size was {}x{}.",
                uploaded.width, uploaded.height
            )));
        }

        Ok(uploaded.secure_url)
    }

    pub async fn edit_doctor(&self, request: EditDoctorRequest) -> Result<(), DoctorError> {
        let Some((name, specialization)) = crate::models::parse_combined(&request.combined) else {
            return Err(DoctorError::ValidationError("Invalid doctor format".to_string()));
        };
        if request.days.is_empty() {
            return Err(DoctorError::ValidationError(
                "Missing or invalid fields".to_string(),
            ));
        }

        let rows = self
            .sheets
            .get_values(&self.spreadsheet_id, DOCTORS_TAB)
            .await
            .map_err(DoctorError::Upstream)?;
        let Some((header, data_rows)) = rows.split_first() else {
            return Err(DoctorError::ValidationError("Doctors sheet is empty".to_string()));
        };

        let mut updated = false;
        let mut new_rows: Vec<Vec<String>> = Vec::new();

        for row in data_rows {
            let mut rec = records(&[header.clone(), row.clone()]).pop().unwrap_or_default();

            let row_name = rec.get("Name").map(|s| s.trim().to_string()).unwrap_or_default();
            let row_spec = rec
                .get("Specialization")
                .map(|s| s.trim().to_string())
                .unwrap_or_default();

            if row_name.eq_ignore_ascii_case(&name) && row_spec.eq_ignore_ascii_case(&specialization)
            {
                rec.insert("Days".to_string(), request.days.join(", "));
                for day in DAY_NAMES {
                    let column = format!("{}Time", day);
                    if rec.contains_key(&column) {
                        rec.insert(
                            column,
                            request.day_times.get(day).cloned().unwrap_or_default(),
                        );
                    }
                }
                updated = true;
            }

            new_rows.push(
                header
                    .iter()
                    .map(|h| rec.get(h).cloned().unwrap_or_default())
                    .collect(),
            );
        }

        if !updated {
            return Err(DoctorError::NotFound);
        }

        self.rewrite_doctors_tab(header, new_rows).await
    }

    pub async fn delete_doctor(&self, combined: &str) -> Result<(), DoctorError> {
        let Some((name, specialization)) = crate::models::parse_combined(combined) else {
            return Err(DoctorError::ValidationError("Invalid format".to_string()));
        };

        let rows = self
            .sheets
            .get_values(&self.spreadsheet_id, DOCTORS_TAB)
            .await
            .map_err(DoctorError::Upstream)?;
        let Some((header, data_rows)) = rows.split_first() else {
            return Err(DoctorError::NotFound);
        };

        let mut found = false;
        let mut kept: Vec<Vec<String>> = Vec::new();
        for row in data_rows {
            let rec = records(&[header.clone(), row.clone()]).pop().unwrap_or_default();
            let row_name = rec.get("Name").map(|s| s.trim()).unwrap_or_default();
            let row_spec = rec.get("Specialization").map(|s| s.trim()).unwrap_or_default();

            if row_name.eq_ignore_ascii_case(&name) && row_spec.eq_ignore_ascii_case(&specialization)
            {
                found = true;
                continue;
            }
            kept.push(row.clone());
        }

        if !found {
            return Err(DoctorError::NotFound);
        }

        self.rewrite_doctors_tab(header, kept).await
    }

    /// Clear and rewrite the `Doctors` tab, renumbering the serial column.
    async fn rewrite_doctors_tab(
        &self,
        header: &[String],
        rows: Vec<Vec<String>>,
    ) -> Result<(), DoctorError> {
        self.sheets
            .clear_values(&self.spreadsheet_id, DOCTORS_TAB)
            .await
            .map_err(DoctorError::Upstream)?;
        self.sheets
            .append_row(&self.spreadsheet_id, DOCTORS_TAB, header)
            .await
            .map_err(DoctorError::Upstream)?;

        for (i, mut row) in rows.into_iter().enumerate() {
            if !row.is_empty() {
                row[0] = (i + 1).to_string();
            }
            self.sheets
                .append_row(&self.spreadsheet_id, DOCTORS_TAB, &row)
                .await
                .map_err(DoctorError::Upstream)?;
        }
        Ok(())
    }
}
