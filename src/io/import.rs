use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::models::ProductRecord;

/// Hard failures surfaced before matching ever runs. Row-level problems are
/// not errors; they are counted and skipped.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read price list: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid price list CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Per-vendor load report: how many rows made it in, how many were dropped.
#[derive(Debug)]
pub struct ImportReport {
    pub vendor_id: String,
    pub records: Vec<ProductRecord>,
    pub skipped: usize,
}

impl ImportReport {
    pub fn loaded(&self) -> usize {
        self.records.len()
    }
}

/// Raw CSV row. Price and category are free text at this stage; anything
/// that does not parse degrades to None rather than failing the import.
#[derive(Debug, Deserialize)]
struct RawRow {
    item_code: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    pack_size: String,
    #[serde(default)]
    unit_price: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// Read a vendor price list from CSV. Expected header:
/// `item_code,description,pack_size,unit_price[,category]`.
///
/// Malformed rows are skipped with a warning and counted in the report;
/// only an unreadable file or broken CSV structure is a hard failure.
pub fn read_price_list<R: std::io::Read>(
    reader: R,
    vendor_id: &str,
) -> Result<ImportReport, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in csv_reader.deserialize::<RawRow>() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("{}: skipping malformed row: {}", vendor_id, e);
                skipped += 1;
                continue;
            }
        };

        if row.item_code.is_empty() {
            tracing::warn!("{}: skipping row without item code", vendor_id);
            skipped += 1;
            continue;
        }

        let unit_price = row.unit_price.as_deref().and_then(|raw| {
            let cleaned = raw.trim_start_matches('$').trim();
            match BigDecimal::from_str(cleaned) {
                Ok(p) => Some(p),
                Err(_) => {
                    tracing::warn!(
                        "{}: item {} has unparseable price {:?}",
                        vendor_id,
                        row.item_code,
                        raw
                    );
                    None
                }
            }
        });

        records.push(ProductRecord {
            vendor_id: vendor_id.to_string(),
            item_code: row.item_code,
            description: row.description,
            pack_size: row.pack_size,
            unit_price,
            category: row.category.filter(|c| !c.is_empty()),
        });
    }

    tracing::info!(
        "{}: loaded {} records, skipped {}",
        vendor_id,
        records.len(),
        skipped
    );

    Ok(ImportReport {
        vendor_id: vendor_id.to_string(),
        records,
        skipped,
    })
}

/// File-path convenience wrapper around [`read_price_list`].
pub fn read_price_list_file(path: &Path, vendor_id: &str) -> Result<ImportReport, ImportError> {
    let file = std::fs::File::open(path)?;
    read_price_list(file, vendor_id)
}
