//! Dataset Module - Historical record loader
//!
//! Reads the historical CSV once at startup into an immutable [`Dataset`].
//! The model trains on it and the regional aggregator reads it; nothing
//! mutates it afterwards.

pub mod record;

#[cfg(test)]
pub(crate) mod fixtures;


use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::logic::error::DataError;
pub use record::HistoricalRecord;

/// Required columns, each with the legacy header it may appear under
pub const REQUIRED_COLUMNS: &[(&str, &str)] = &[
    ("date", "Data"),
    ("region_id", "Provincia"),
    ("temperature", "Temperatura (°C)"),
    ("humidity", "Umidità (%)"),
    ("precipitation", "Precipitazioni (mm)"),
    ("trees_total", "Alberi_Totali"),
    ("trees_infected", "Alberi_Infetti"),
    ("trees_replanted", "Alberi_Ripiantati"),
    ("oil_yield", "Produzione_Olio"),
];

/// Immutable set of historical records plus where they came from
#[derive(Debug, Clone)]
pub struct Dataset {
    source_name: String,
    fingerprint: String,
    records: Vec<HistoricalRecord>,
}

impl Dataset {
    /// Wrap records that were produced in memory (fixtures, tests)
    pub fn from_records(source_name: impl Into<String>, records: Vec<HistoricalRecord>) -> Self {
        let mut hasher = Sha256::new();
        for r in &records {
            hasher.update(format!("{:?}\n", r).as_bytes());
        }
        Self {
            source_name: source_name.into(),
            fingerprint: hex::encode(hasher.finalize()),
            records,
        }
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// SHA-256 of the loaded bytes (hex)
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Distinct region ids, sorted (dropdown options)
    pub fn regions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.region_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records belonging to one region, in file order
    pub fn for_region<'a>(&'a self, region_id: &'a str) -> impl Iterator<Item = &'a HistoricalRecord> + 'a {
        self.records.iter().filter(move |r| r.region_id == region_id)
    }

    /// Observed (min, max) of the regression target
    pub fn target_range(&self) -> Option<(f64, f64)> {
        target_range(&self.records)
    }
}

pub(crate) fn target_range(records: &[HistoricalRecord]) -> Option<(f64, f64)> {
    records.iter().map(HistoricalRecord::target).fold(None, |acc, y| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    })
}

/// Load the dataset from a CSV file on disk
pub fn load(source: impl AsRef<Path>) -> Result<Dataset, DataError> {
    let path = source.as_ref();
    let source_name = path.display().to_string();

    if !path.exists() {
        return Err(DataError::unavailable(source_name, "file not found"));
    }

    let bytes = fs::read(path).map_err(|e| DataError::unavailable(&source_name, e.to_string()))?;
    load_from_bytes(&source_name, &bytes)
}

/// Load the dataset from any reader (stdin, in-memory buffers)
pub fn load_from_reader<R: Read>(source_name: &str, mut reader: R) -> Result<Dataset, DataError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| DataError::unavailable(source_name, e.to_string()))?;
    load_from_bytes(source_name, &bytes)
}

fn load_from_bytes(source_name: &str, bytes: &[u8]) -> Result<Dataset, DataError> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(DataError::unavailable(source_name, "source is empty"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| DataError::unavailable(source_name, format!("cannot read header: {}", e)))?
        .clone();
    check_columns(source_name, &headers)?;

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<HistoricalRecord>().enumerate() {
        // Header is line 1
        let line = index + 2;
        let record = row.map_err(|e| DataError::unavailable(source_name, row_error(&e, line)))?;
        record
            .check()
            .map_err(|reason| DataError::unavailable(source_name, format!("line {}: {}", line, reason)))?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(DataError::unavailable(source_name, "no data rows"));
    }

    let fingerprint = hex::encode(Sha256::digest(bytes));
    log::info!(
        "Loaded {} historical records from {} (sha256 {})",
        records.len(),
        source_name,
        &fingerprint[..12]
    );

    Ok(Dataset {
        source_name: source_name.to_string(),
        fingerprint,
        records,
    })
}

/// `line N: <detail>` without the position the csv crate already embeds
fn row_error(error: &csv::Error, fallback_line: usize) -> String {
    let line = error
        .position()
        .map_or(fallback_line as u64, |pos| pos.line());

    match error.kind() {
        csv::ErrorKind::Deserialize { err, .. } => format!("line {}: {}", line, err),
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            format!("line {}: expected {} fields, found {}", line, expected_len, len)
        }
        csv::ErrorKind::Utf8 { err, .. } => format!("line {}: {}", line, err),
        _ => error.to_string(),
    }
}

fn check_columns(source_name: &str, headers: &csv::StringRecord) -> Result<(), DataError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|(name, legacy)| !headers.iter().any(|h| h == *name || h == *legacy))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataError::unavailable(
            source_name,
            format!("missing required column(s): {}", missing.join(", ")),
        ))
    }
}
