use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// A doctor as served to clients, reshaped from one row of the `Doctors`
/// tab. Field names mirror the spreadsheet columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Specialization")]
    pub specialization: String,
    #[serde(rename = "Days")]
    pub days: Vec<String>,
    #[serde(rename = "DayTimes")]
    pub day_times: HashMap<String, String>,
    #[serde(rename = "Time")]
    pub time_summary: String,
    #[serde(rename = "SheetURL")]
    pub sheet_url: String,
    #[serde(rename = "Image")]
    pub image_url: String,
}

impl Doctor {
    pub fn combined(&self) -> String {
        format!("{} - {}", self.name, self.specialization)
    }

    pub fn works_on(&self, weekday: &str) -> bool {
        self.days.iter().any(|d| d == weekday)
    }

    /// The configured time window for a weekday, empty if none.
    pub fn time_for(&self, weekday: &str) -> String {
        self.day_times.get(weekday).cloned().unwrap_or_default()
    }

    pub fn matches(&self, name: &str, specialization: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
            && self
                .specialization
                .trim()
                .eq_ignore_ascii_case(specialization.trim())
    }
}

/// Split a `"Name - Specialization"` string into its parts.
pub fn parse_combined(combined: &str) -> Option<(String, String)> {
    let (name, specialization) = combined.split_once(" - ")?;
    let name = name.trim();
    let specialization = specialization.trim();
    if name.is_empty() || specialization.is_empty() {
        return None;
    }
    Some((name.to_string(), specialization.to_string()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddDoctorRequest {
    pub name: String,
    pub specialization: String,
    pub days: Vec<String>,
    pub day_times: HashMap<String, String>,
    /// Optional profile photo as a base64 data URI.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditDoctorRequest {
    pub combined: String,
    pub days: Vec<String>,
    pub day_times: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteDoctorRequest {
    pub combined: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaveEntry {
    pub date: String,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddLeaveRequest {
    pub combined: String,
    pub date: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteLeaveRequest {
    pub combined: String,
    pub date: String,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    ValidationError(String),

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}
