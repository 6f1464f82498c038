use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_sheets::{SheetProperties, SheetsClient};

pub const STATS_TAB: &str = "BookingStats";
pub const STATS_COUNTER_CELL: &str = "BookingStats!A2";

const CLEANUP_THRESHOLD: u32 = 10;
const KEEP_RECENT_TABS: usize = 4;

/// Booking bookkeeping: a global counter in the main spreadsheet paces a
/// periodic prune of old date tabs in the booked doctor's spreadsheet.
/// Everything here is best-effort; a booking whose row is already appended
/// must never fail because of it.
pub struct CleanupService {
    sheets: SheetsClient,
    main_spreadsheet_id: String,
}

impl CleanupService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            sheets: SheetsClient::new(config),
            main_spreadsheet_id: config.main_spreadsheet_id.clone(),
        }
    }

    /// Called after every successful booking append.
    pub async fn record_booking(&self, doctor_spreadsheet_id: &str) {
        if let Err(e) = self.record_booking_inner(doctor_spreadsheet_id).await {
            warn!("Booking cleanup bookkeeping failed: {}", e);
        }
    }

    async fn record_booking_inner(&self, doctor_spreadsheet_id: &str) -> Result<()> {
        self.ensure_stats_tab().await?;

        let count = self.read_counter().await? + 1;
        if count >= CLEANUP_THRESHOLD {
            self.sheets
                .update_cell(&self.main_spreadsheet_id, STATS_COUNTER_CELL, "0")
                .await?;
            self.prune_old_tabs(doctor_spreadsheet_id).await?;
        } else {
            self.sheets
                .update_cell(&self.main_spreadsheet_id, STATS_COUNTER_CELL, &count.to_string())
                .await?;
        }
        Ok(())
    }

    async fn ensure_stats_tab(&self) -> Result<()> {
        let sheets = self.sheets.list_sheets(&self.main_spreadsheet_id).await?;
        if sheets.iter().any(|s| s.title == STATS_TAB) {
            return Ok(());
        }

        debug!("BookingStats tab missing, creating it");
        self.sheets.add_sheet(&self.main_spreadsheet_id, STATS_TAB, 10, 1).await?;
        self.sheets
            .append_row(&self.main_spreadsheet_id, STATS_TAB, &["BookingCount".to_string()])
            .await?;
        Ok(())
    }

    async fn read_counter(&self) -> Result<u32> {
        let rows = self
            .sheets
            .get_values(&self.main_spreadsheet_id, STATS_COUNTER_CELL)
            .await?;
        let value = rows
            .first()
            .and_then(|row| row.first())
            .and_then(|cell| cell.trim().parse().ok())
            .unwrap_or(0);
        Ok(value)
    }

    /// Delete all but the newest date tabs of one doctor's spreadsheet.
    async fn prune_old_tabs(&self, spreadsheet_id: &str) -> Result<()> {
        let sheets = self.sheets.list_sheets(spreadsheet_id).await?;
        for stale in stale_date_tabs(&sheets, KEEP_RECENT_TABS) {
            debug!("Deleting stale date tab {}", stale.title);
            self.sheets.delete_sheet(spreadsheet_id, stale.sheet_id).await?;
        }
        Ok(())
    }
}

/// Tabs whose titles parse as `DD-MM-YYYY`, minus the `keep` newest ones.
/// Non-date tabs (the roster header sheet, stats) are never touched.
pub fn stale_date_tabs(sheets: &[SheetProperties], keep: usize) -> Vec<SheetProperties> {
    let mut dated: Vec<(NaiveDate, SheetProperties)> = sheets
        .iter()
        .filter_map(|s| {
            NaiveDate::parse_from_str(&s.title, "%d-%m-%Y")
                .ok()
                .map(|date| (date, s.clone()))
        })
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    if dated.len() <= keep {
        return Vec::new();
    }
    let stale_count = dated.len() - keep;
    dated.into_iter().take(stale_count).map(|(_, s)| s).collect()
}
