//! Reading tracker exports into untyped rows.

use crate::errors::{AppError, AppResult};
use crate::models::ticket::RawTicketRow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a CSV export. Column order does not matter; repeated headers are kept.
pub fn read_csv(path: &Path) -> AppResult<Vec<RawTicketRow>> {
    let file = File::open(path).map_err(|e| {
        AppError::Import(format!("cannot open {}: {}", path.display(), e))
    })?;
    read_csv_from(file)
}

/// UTF-8 text of a cell; invalid sequences become U+FFFD.
fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

pub fn read_csv_from<R: Read>(reader: R) -> AppResult<Vec<RawTicketRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| decode(h).trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::Import("the file has no header row".into()));
    }

    let mut rows = Vec::new();
    // Fields are decoded one by one: a badly encoded cell is repaired, never fatal.
    for record in rdr.byte_records() {
        let record = record?;
        let row = RawTicketRow::from_pairs(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.as_str(), decode(v))),
        );
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Ok(rows)
}
