use std::collections::HashMap;

/// Zip a header row with the remaining rows into records, the way a
/// spreadsheet is usually read. Short rows are padded with empty strings;
/// extra cells beyond the header are dropped.
pub fn records(rows: &[Vec<String>]) -> Vec<HashMap<String, String>> {
    let Some((header, data_rows)) = rows.split_first() else {
        return Vec::new();
    };

    data_rows
        .iter()
        .map(|row| {
            header
                .iter()
                .enumerate()
                .map(|(i, key)| {
                    let cell = row.get(i).cloned().unwrap_or_default();
                    (key.clone(), cell)
                })
                .collect()
        })
        .collect()
}

/// True when a data row has at least one non-blank cell. Spreadsheets keep
/// rows around after manual deletions, so blank rows must not count.
pub fn row_has_content(row: &[String]) -> bool {
    row.iter().any(|cell| !cell.trim().is_empty())
}
