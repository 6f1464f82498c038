use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use doctor_cell::models::Doctor;
use doctor_cell::services::directory::{weekday_name, DoctorDirectoryService};
use doctor_cell::services::leave::LeaveService;
use doctor_cell::services::roster::PATIENT_SHEET_HEADER;
use shared_config::AppConfig;
use shared_sheets::{row_has_content, spreadsheet_id_from_url, SheetsClient};

use crate::models::{
    BookDepartmentRequest, BookDoctorRequest, BookingConfirmation, BookingError, PatientDetails,
};
use crate::services::cleanup::CleanupService;

/// Appends patient rows to per-doctor spreadsheets. One tab per service
/// date, named `DD-MM-YYYY`; the visit token is the row position.
pub struct BookingService {
    sheets: SheetsClient,
    directory: Arc<DoctorDirectoryService>,
    leave: LeaveService,
    cleanup: CleanupService,
}

impl BookingService {
    pub fn new(config: &AppConfig, directory: Arc<DoctorDirectoryService>) -> Self {
        Self {
            sheets: SheetsClient::new(config),
            directory,
            leave: LeaveService::new(config),
            cleanup: CleanupService::new(config),
        }
    }

    /// Book with a specific doctor, addressed by sheet URL.
    pub async fn book_direct(
        &self,
        request: BookDoctorRequest,
    ) -> Result<BookingConfirmation, BookingError> {
        let date = parse_date(&request.date)?;
        let doctor = self
            .directory
            .find_by_sheet_url(request.sheet_url.trim())
            .await
            .ok_or_else(|| BookingError::NotFound("Doctor not found.".to_string()))?;

        self.check_availability(&doctor, date, &request.date).await?;

        let patient = PatientDetails {
            name: request.name,
            age: request.age,
            gender: request.gender,
            phone_number: request.phone_number,
        };
        self.book_with(&doctor, date, &request.date, patient).await
    }

    /// Book within a specialization, picking the least-loaded doctor working
    /// that day unless a sheet URL narrows the choice.
    pub async fn book_department(
        &self,
        request: BookDepartmentRequest,
    ) -> Result<BookingConfirmation, BookingError> {
        let date = parse_date(&request.date)?;
        let specialization = request.specialization.trim();

        let working = self.directory.available_on(date, Some(specialization)).await;
        let mut candidates: Vec<Doctor> = Vec::new();
        for doctor in working {
            let on_leave = self
                .leave
                .is_on_leave(&doctor.name, &doctor.specialization, &request.date)
                .await
                .map_err(BookingError::Upstream)?;
            if !on_leave {
                candidates.push(doctor);
            }
        }

        if candidates.is_empty() {
            return Err(BookingError::Unavailable(
                "No doctors available for the selected date.".to_string(),
            ));
        }

        let doctor = match request.doctor_sheet_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => candidates
                .into_iter()
                .find(|d| d.sheet_url == url)
                .ok_or_else(|| {
                    BookingError::Unavailable(
                        "Selected doctor is not available on that date.".to_string(),
                    )
                })?,
            _ => self.least_loaded(candidates, date).await?,
        };

        let patient = PatientDetails {
            name: request.name,
            age: request.age,
            gender: request.gender,
            phone_number: request.phone_number,
        };
        self.book_with(&doctor, date, &request.date, patient).await
    }

    async fn check_availability(
        &self,
        doctor: &Doctor,
        date: NaiveDate,
        date_str: &str,
    ) -> Result<(), BookingError> {
        let weekday = weekday_name(date);
        if !doctor.works_on(&weekday) {
            return Err(BookingError::Unavailable(
                "Doctor is not available on the selected day.".to_string(),
            ));
        }

        let on_leave = self
            .leave
            .is_on_leave(&doctor.name, &doctor.specialization, date_str)
            .await
            .map_err(BookingError::Upstream)?;
        if on_leave {
            return Err(BookingError::Unavailable(
                "Doctor is on leave on the selected date.".to_string(),
            ));
        }
        Ok(())
    }

    async fn book_with(
        &self,
        doctor: &Doctor,
        date: NaiveDate,
        date_str: &str,
        patient: PatientDetails,
    ) -> Result<BookingConfirmation, BookingError> {
        let spreadsheet_id = doctor_spreadsheet_id(doctor)?;
        let tab = date_tab_title(date);

        self.ensure_date_tab(&spreadsheet_id, &tab)
            .await
            .map_err(BookingError::Upstream)?;

        let token = self
            .booked_count(&spreadsheet_id, &tab)
            .await
            .map_err(BookingError::Upstream)?
            + 1;

        self.sheets
            .append_row(&spreadsheet_id, &tab, &patient.row(token, date_str))
            .await
            .map_err(BookingError::Upstream)?;
        info!(
            "Booked token {} with {} for {}",
            token,
            doctor.combined(),
            date_str
        );

        self.cleanup.record_booking(&spreadsheet_id).await;

        let weekday = weekday_name(date);
        Ok(BookingConfirmation::new(
            token,
            &doctor.name,
            &doctor.specialization,
            date_str,
            &doctor.time_for(&weekday),
            &patient,
        ))
    }

    /// Candidate with the fewest booked rows for the date. Candidates whose
    /// spreadsheet cannot be read are skipped.
    async fn least_loaded(
        &self,
        candidates: Vec<Doctor>,
        date: NaiveDate,
    ) -> Result<Doctor, BookingError> {
        let tab = date_tab_title(date);
        let mut best: Option<(usize, Doctor)> = None;

        for doctor in candidates {
            let spreadsheet_id = match doctor_spreadsheet_id(&doctor) {
                Ok(id) => id,
                Err(_) => {
                    warn!("Skipping {}: invalid sheet URL", doctor.combined());
                    continue;
                }
            };
            let count = match self.booked_count(&spreadsheet_id, &tab).await {
                Ok(count) => count,
                Err(e) => {
                    warn!("Skipping {}: {}", doctor.combined(), e);
                    continue;
                }
            };

            debug!("{} has {} bookings on {}", doctor.combined(), count, tab);
            match &best {
                Some((best_count, _)) if *best_count <= count => {}
                _ => best = Some((count, doctor)),
            }
        }

        best.map(|(_, doctor)| doctor).ok_or_else(|| {
            BookingError::Unavailable("No doctors available for the selected date.".to_string())
        })
    }

    /// Non-empty data rows in a date tab; 0 when the tab does not exist yet.
    async fn booked_count(&self, spreadsheet_id: &str, tab: &str) -> Result<usize> {
        let sheets = self.sheets.list_sheets(spreadsheet_id).await?;
        if !sheets.iter().any(|s| s.title == tab) {
            return Ok(0);
        }

        let rows = self.sheets.get_values(spreadsheet_id, tab).await?;
        Ok(rows
            .iter()
            .skip(1)
            .filter(|row| row_has_content(row))
            .count())
    }

    async fn ensure_date_tab(&self, spreadsheet_id: &str, tab: &str) -> Result<()> {
        let sheets = self.sheets.list_sheets(spreadsheet_id).await?;
        if sheets.iter().any(|s| s.title == tab) {
            return Ok(());
        }

        debug!("Creating date tab {} in {}", tab, spreadsheet_id);
        self.sheets.add_sheet(spreadsheet_id, tab, 200, 6).await?;
        let header: Vec<String> = PATIENT_SHEET_HEADER.iter().map(|s| s.to_string()).collect();
        self.sheets.append_row(spreadsheet_id, tab, &header).await?;
        Ok(())
    }
}

fn doctor_spreadsheet_id(doctor: &Doctor) -> Result<String, BookingError> {
    spreadsheet_id_from_url(&doctor.sheet_url).ok_or_else(|| {
        BookingError::ValidationError("Doctor record has no valid sheet URL.".to_string())
    })
}

pub fn date_tab_title(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

fn parse_date(date_str: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| BookingError::ValidationError("Invalid date format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_tab_title() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(date_tab_title(date), "02-03-2026");
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("2026-03-02").is_ok());
        assert!(parse_date("02-03-2026").is_err());
        assert!(parse_date("not a date").is_err());
    }
}
