//! Output formatting and persistence for dashboard views.
//!
//! Supports pretty-printing, JSON serialization, and CSV export of the
//! filtered records, optionally gzip-compressed.

use anyhow::{Context, Result};
use chrono::Local;
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use tracing::{debug, info};

use crate::records::CanonicalRecord;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Writes a value as pretty-printed JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// A canonical record laid out with the survey's own column headers, so an
/// export can be loaded back as a speed-test source.
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    #[serde(rename = "Timestamp")]
    timestamp: &'a str,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Service Provider")]
    provider: &'static str,
    #[serde(rename = "Download (Mbps)")]
    download: f64,
    #[serde(rename = "Upload (Mbps)")]
    upload: f64,
    #[serde(rename = "Latency ( ms )")]
    latency: Option<f64>,
    #[serde(rename = "Range")]
    download_range: &'a str,
    #[serde(rename = "Range (Upload)")]
    upload_range: &'a str,
    #[serde(rename = "Location (Brgy, City)")]
    location: String,
    #[serde(rename = "Capital")]
    province: &'a str,
}

impl<'a> From<&'a CanonicalRecord> for ExportRow<'a> {
    fn from(r: &'a CanonicalRecord) -> Self {
        let has_location = !(r.barangay.is_empty() && r.city.is_empty() && r.province.is_empty());

        Self {
            timestamp: &r.timestamp,
            date: r.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            provider: r.provider.as_str(),
            download: r.download,
            upload: r.upload,
            latency: r.latency,
            download_range: &r.download_range,
            upload_range: &r.upload_range,
            location: if has_location {
                format!("{}, {}, {}", r.barangay, r.city, r.province)
            } else {
                String::new()
            },
            province: &r.province,
        }
    }
}

/// Serializes `records` as headered CSV into `writer`.
pub fn write_csv<W: Write>(writer: W, records: &[CanonicalRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for record in records {
        writer.serialize(ExportRow::from(record))?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes `records` to `path`, gzip-compressed when `gzip` is set.
pub fn export_records(path: &str, records: &[CanonicalRecord], gzip: bool) -> Result<()> {
    debug!(path, gzip, rows = records.len(), "Exporting records");
    let file = File::create(path).with_context(|| format!("Failed to create '{path}'"))?;

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        write_csv(&mut encoder, records)?;
        encoder.finish()?;
    } else {
        write_csv(file, records)?;
    }

    info!(path, rows = records.len(), "Export written");
    Ok(())
}

/// `mno_performance_<today>.csv`, with `.gz` appended for compressed exports.
pub fn default_export_name(gzip: bool) -> String {
    let name = format!("mno_performance_{}.csv", Local::now().format("%Y-%m-%d"));
    if gzip { format!("{name}.gz") } else { name }
}
