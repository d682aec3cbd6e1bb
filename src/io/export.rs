use bigdecimal::BigDecimal;
use std::path::Path;
use thiserror::Error;

use crate::models::MatchCandidate;

/// Column order and the presence of this header row are the only
/// compatibility contract of the CSV export.
pub const CSV_HEADER: [&str; 8] = [
    "left_vendor",
    "left_code",
    "left_description",
    "right_vendor",
    "right_code",
    "right_description",
    "score",
    "price_delta",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

fn option_to_csv(val: &Option<BigDecimal>) -> String {
    val.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

/// Write candidates as CSV, header row included.
pub fn write_csv<W: std::io::Write>(
    candidates: &[MatchCandidate],
    writer: W,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_HEADER)?;

    for candidate in candidates {
        writer.write_record(&[
            candidate.left.vendor_id.clone(),
            candidate.left.item_code.clone(),
            candidate.left.description.clone(),
            candidate.right.vendor_id.clone(),
            candidate.right.item_code.clone(),
            candidate.right.description.clone(),
            format!("{:.4}", candidate.score),
            option_to_csv(&candidate.price_delta),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// CSV as an in-memory string, for the HTTP export endpoint.
pub fn csv_string(candidates: &[MatchCandidate]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(candidates, &mut buf)?;
    // The writer only ever emits UTF-8.
    Ok(String::from_utf8(buf).expect("CSV output is valid UTF-8"))
}

/// Write candidates as CSV to a file.
pub fn export_to_csv(candidates: &[MatchCandidate], output_path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(output_path)?;
    write_csv(candidates, file)
}

/// Pretty JSON export of the same rows.
pub fn json_string(candidates: &[MatchCandidate]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(candidates)
}
