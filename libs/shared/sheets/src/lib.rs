pub mod client;
pub mod rows;

pub use client::{spreadsheet_id_from_url, CreatedSpreadsheet, SheetProperties, SheetsClient};
pub use rows::{records, row_has_content};
