use anyhow::Result;
use chrono::NaiveDate;
use tracing::debug;

use shared_config::AppConfig;
use shared_sheets::{records, SheetsClient};

use crate::models::{DoctorError, LeaveEntry};

pub const LEAVE_TAB: &str = "Leave";

const LEAVE_HEADER: [&str; 4] = ["DoctorName", "Specialization", "Date", "Reason"];

/// Reads and writes the `Leave` tab of the main spreadsheet, one row per
/// (doctor, specialization, date).
pub struct LeaveService {
    sheets: SheetsClient,
    spreadsheet_id: String,
}

impl LeaveService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            sheets: SheetsClient::new(config),
            spreadsheet_id: config.main_spreadsheet_id.clone(),
        }
    }

    /// Create the `Leave` tab with its header if the spreadsheet does not
    /// have one yet.
    async fn ensure_leave_tab(&self) -> Result<()> {
        let sheets = self.sheets.list_sheets(&self.spreadsheet_id).await?;
        if sheets.iter().any(|s| s.title == LEAVE_TAB) {
            return Ok(());
        }

        debug!("Leave tab missing, creating it");
        self.sheets.add_sheet(&self.spreadsheet_id, LEAVE_TAB, 200, 4).await?;
        let header: Vec<String> = LEAVE_HEADER.iter().map(|s| s.to_string()).collect();
        self.sheets.append_row(&self.spreadsheet_id, LEAVE_TAB, &header).await?;
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<std::collections::HashMap<String, String>>> {
        self.ensure_leave_tab().await?;
        let rows = self.sheets.get_values(&self.spreadsheet_id, LEAVE_TAB).await?;
        Ok(records(&rows))
    }

    /// Whether the doctor has a leave entry for the exact `YYYY-MM-DD` date.
    pub async fn is_on_leave(
        &self,
        doctor_name: &str,
        specialization: &str,
        date_str: &str,
    ) -> Result<bool> {
        let entries = self.entries().await?;
        Ok(entries.iter().any(|row| {
            matches_doctor(row, doctor_name, specialization)
                && row.get("Date").map(|d| d.trim()) == Some(date_str)
        }))
    }

    /// Leave entries for one doctor, sorted by date ascending.
    pub async fn leaves_for(
        &self,
        doctor_name: &str,
        specialization: &str,
    ) -> Result<Vec<LeaveEntry>> {
        let entries = self.entries().await?;
        let mut leaves: Vec<LeaveEntry> = entries
            .iter()
            .filter(|row| matches_doctor(row, doctor_name, specialization))
            .map(|row| LeaveEntry {
                date: row.get("Date").map(|d| d.trim().to_string()).unwrap_or_default(),
                reason: row.get("Reason").map(|r| r.trim().to_string()).unwrap_or_default(),
            })
            .collect();
        leaves.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(leaves)
    }

    /// Record a leave day. Duplicate (doctor, specialization, date) entries
    /// are rejected.
    pub async fn add(
        &self,
        doctor_name: &str,
        specialization: &str,
        date_str: &str,
        reason: &str,
    ) -> Result<(), DoctorError> {
        if NaiveDate::parse_from_str(date_str, "%Y-%m-%d").is_err() {
            return Err(DoctorError::ValidationError("Invalid date format".to_string()));
        }

        if self.is_on_leave(doctor_name, specialization, date_str).await? {
            return Err(DoctorError::Duplicate(
                "Leave already set for this doctor on this date.".to_string(),
            ));
        }

        let row: Vec<String> = vec![
            doctor_name.to_string(),
            specialization.to_string(),
            date_str.to_string(),
            reason.to_string(),
        ];
        self.sheets
            .append_row(&self.spreadsheet_id, LEAVE_TAB, &row)
            .await
            .map_err(DoctorError::Upstream)?;
        Ok(())
    }

    /// Remove a leave entry by clearing and rewriting the tab without it.
    pub async fn remove(
        &self,
        doctor_name: &str,
        specialization: &str,
        date_str: &str,
    ) -> Result<(), DoctorError> {
        self.ensure_leave_tab().await?;
        let rows = self
            .sheets
            .get_values(&self.spreadsheet_id, LEAVE_TAB)
            .await
            .map_err(DoctorError::Upstream)?;

        let Some((header, data_rows)) = rows.split_first() else {
            return Err(DoctorError::NotFound);
        };

        let mut kept: Vec<Vec<String>> = Vec::new();
        let mut removed = false;
        for row in data_rows {
            let rec: std::collections::HashMap<String, String> =
                records(&[header.clone(), row.clone()]).pop().unwrap_or_default();
            if matches_doctor(&rec, doctor_name, specialization)
                && rec.get("Date").map(|d| d.trim()) == Some(date_str)
            {
                removed = true;
                continue;
            }
            kept.push(row.clone());
        }

        if !removed {
            return Err(DoctorError::NotFound);
        }

        self.sheets
            .clear_values(&self.spreadsheet_id, LEAVE_TAB)
            .await
            .map_err(DoctorError::Upstream)?;
        self.sheets
            .append_row(&self.spreadsheet_id, LEAVE_TAB, header)
            .await
            .map_err(DoctorError::Upstream)?;
        for row in &kept {
            self.sheets
                .append_row(&self.spreadsheet_id, LEAVE_TAB, row)
                .await
                .map_err(DoctorError::Upstream)?;
        }
        Ok(())
    }
}

fn matches_doctor(
    row: &std::collections::HashMap<String, String>,
    doctor_name: &str,
    specialization: &str,
) -> bool {
    let row_name = row.get("DoctorName").map(|s| s.trim()).unwrap_or_default();
    let row_spec = row.get("Specialization").map(|s| s.trim()).unwrap_or_default();
    row_name.eq_ignore_ascii_case(doctor_name.trim())
        && row_spec.eq_ignore_ascii_case(specialization.trim())
}
