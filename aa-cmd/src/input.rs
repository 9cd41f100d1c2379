//! Reading forecast exports and engine configuration from disk.

use aa_engine::event::AA_CSV_KEYS;
use aa_engine::{parse_raw_rows_csv, EngineConfig, RawForecastRow};
use anyhow::Context;
use csv::{ReaderBuilder, Trim};
use flate2::read::GzDecoder;
use log::{info, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a text file, decompressing it when the name ends in `.gz`.
pub fn read_text(path: &str) -> anyhow::Result<String> {
    let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
    let mut text = String::new();
    if Path::new(path).extension().is_some_and(|ext| ext == "gz") {
        GzDecoder::new(file)
            .read_to_string(&mut text)
            .with_context(|| format!("Failed to decompress {path}"))?;
    } else {
        let mut file = file;
        file.read_to_string(&mut text)
            .with_context(|| format!("Failed to read {path}"))?;
    }
    Ok(text)
}

/// Columns the engine reads that are absent from the CSV header.
pub fn missing_columns(csv_data: &str) -> anyhow::Result<Vec<&'static str>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(csv_data.as_bytes());
    let header = rdr.headers().context("Failed to read CSV header")?;
    Ok(AA_CSV_KEYS
        .iter()
        .copied()
        .filter(|key| !header.iter().any(|column| column == *key))
        .collect())
}

/// Load the raw rows of a forecast export.
pub fn load_rows(path: &str) -> anyhow::Result<Vec<RawForecastRow>> {
    let csv_data = read_text(path)?;
    let missing = missing_columns(&csv_data)?;
    if !missing.is_empty() {
        warn!("{path} is missing columns: {}", missing.join(", "));
    }
    let rows = parse_raw_rows_csv(&csv_data)
        .with_context(|| format!("Failed to parse forecast CSV {path}"))?;
    info!("Read {} forecast rows from {}", rows.len(), path);
    Ok(rows)
}

/// Load an engine configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&str>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => {
            let json = read_text(path)?;
            EngineConfig::from_json(&json)
                .with_context(|| format!("Invalid configuration in {path}"))
        }
        None => Ok(EngineConfig::default()),
    }
}
