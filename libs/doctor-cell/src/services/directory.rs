use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_sheets::{records, SheetsClient};

use crate::models::{Doctor, DAY_NAMES};

pub const DOCTORS_TAB: &str = "Doctors";

const CACHE_TTL: Duration = Duration::from_secs(30);

#[derive(Default)]
struct DirectoryCache {
    doctors: Vec<Doctor>,
    fetched_at: Option<Instant>,
}

/// Cached reader over the `Doctors` tab. A single values read per refresh
/// keeps the spreadsheet API quota in check; the cache is shared between the
/// doctor and booking cells.
pub struct DoctorDirectoryService {
    sheets: SheetsClient,
    spreadsheet_id: String,
    ttl: Duration,
    cache: RwLock<DirectoryCache>,
}

impl DoctorDirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_ttl(config, CACHE_TTL)
    }

    pub fn with_ttl(config: &AppConfig, ttl: Duration) -> Self {
        Self {
            sheets: SheetsClient::new(config),
            spreadsheet_id: config.main_spreadsheet_id.clone(),
            ttl,
            cache: RwLock::new(DirectoryCache::default()),
        }
    }

    /// All doctors, served from the cache while it is fresh. An upstream
    /// failure is logged and reported as an empty directory so listing
    /// pages keep rendering.
    pub async fn list_doctors(&self) -> Vec<Doctor> {
        if let Some(cached) = self.cached().await {
            return cached;
        }

        match self.refresh().await {
            Ok(doctors) => doctors,
            Err(e) => {
                error!("Error reading Doctors sheet: {}", e);
                Vec::new()
            }
        }
    }

    async fn cached(&self) -> Option<Vec<Doctor>> {
        let cache = self.cache.read().await;
        match cache.fetched_at {
            Some(at) if at.elapsed() < self.ttl => Some(cache.doctors.clone()),
            _ => None,
        }
    }

    /// Re-read the `Doctors` tab and replace the cache.
    pub async fn refresh(&self) -> Result<Vec<Doctor>> {
        debug!("Refreshing doctor directory from spreadsheet");
        let rows = self.sheets.get_values(&self.spreadsheet_id, DOCTORS_TAB).await?;
        let doctors = doctors_from_rows(&rows);

        let mut cache = self.cache.write().await;
        cache.doctors = doctors.clone();
        cache.fetched_at = Some(Instant::now());
        Ok(doctors)
    }

    /// Drop the cache so the next read goes back to the spreadsheet. Called
    /// after admin mutations.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        cache.fetched_at = None;
    }

    /// Sorted distinct specializations.
    pub async fn specializations(&self) -> Vec<String> {
        let mut specs: Vec<String> = Vec::new();
        for doctor in self.list_doctors().await {
            let spec = doctor.specialization.trim().to_string();
            if !spec.is_empty() && !specs.iter().any(|s| s.eq_ignore_ascii_case(&spec)) {
                specs.push(spec);
            }
        }
        specs.sort_by_key(|s| s.to_lowercase());
        specs
    }

    /// Sorted `"Name - Specialization"` pairs.
    pub async fn doctor_pairs(&self) -> Vec<String> {
        let mut pairs: Vec<String> = self
            .list_doctors()
            .await
            .iter()
            .filter(|d| !d.name.is_empty() && !d.specialization.is_empty())
            .map(|d| d.combined())
            .collect();
        pairs.sort();
        pairs
    }

    /// Doctors working on the weekday of `date`, optionally restricted to a
    /// specialization (trim + case-insensitive, like every other
    /// name/specialization match). Leave days are checked separately at
    /// booking time.
    pub async fn available_on(&self, date: NaiveDate, specialization: Option<&str>) -> Vec<Doctor> {
        let weekday = weekday_name(date);
        self.list_doctors()
            .await
            .into_iter()
            .filter(|d| d.works_on(&weekday))
            .filter(|d| match specialization {
                Some(spec) => d.specialization.trim().eq_ignore_ascii_case(spec.trim()),
                None => true,
            })
            .collect()
    }

    pub async fn find_by_sheet_url(&self, sheet_url: &str) -> Option<Doctor> {
        self.list_doctors()
            .await
            .into_iter()
            .find(|d| d.sheet_url == sheet_url)
    }
}

pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Reshape raw sheet rows into doctors: days become a list, the per-day time
/// columns become a map, and a compact `Mon: 09:00-11:00; ...` summary is
/// derived in weekday order.
pub fn doctors_from_rows(rows: &[Vec<String>]) -> Vec<Doctor> {
    records(rows)
        .into_iter()
        .filter_map(|rec| {
            let name = rec.get("Name").map(|s| s.trim().to_string()).unwrap_or_default();
            let specialization = rec
                .get("Specialization")
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            if name.is_empty() && specialization.is_empty() {
                return None;
            }

            let days: Vec<String> = rec
                .get("Days")
                .map(|s| {
                    s.split(',')
                        .map(|d| d.trim().to_string())
                        .filter(|d| !d.is_empty())
                        .collect()
                })
                .unwrap_or_default();

            let mut day_times = std::collections::HashMap::new();
            for day in DAY_NAMES {
                let column = format!("{}Time", day);
                if let Some(t) = rec.get(&column) {
                    let t = t.trim();
                    if !t.is_empty() {
                        day_times.insert(day.to_string(), t.to_string());
                    }
                }
            }

            let mut parts = Vec::new();
            for day in DAY_NAMES {
                if let Some(t) = day_times.get(day) {
                    parts.push(format!("{}: {}", &day[..3], t));
                }
            }
            let time_summary = parts.join("; ");

            Some(Doctor {
                name,
                specialization,
                days,
                day_times,
                time_summary,
                sheet_url: rec.get("SheetURL").map(|s| s.trim().to_string()).unwrap_or_default(),
                image_url: rec.get("Image").map(|s| s.trim().to_string()).unwrap_or_default(),
            })
        })
        .collect()
}
