//! Record normalization.
//!
//! Turns loosely-labelled survey rows into [`CanonicalRecord`]s: carrier
//! names are resolved to a [`Provider`], speeds are coerced to Mbps, the
//! location string is decomposed, and dates are parsed. Field-level parse
//! failures degrade to zero or `None`; only a missing/unknown provider or a
//! missing download value rejects a row.

pub mod bucket;
pub mod date;
pub mod location;
pub mod provider;
pub mod speed;
pub mod types;

pub use bucket::{SpeedBucket, SpeedTier};
pub use location::Location;
pub use provider::Provider;
pub use types::{CanonicalRecord, CityAggregate, DailySample};

use tracing::debug;

use crate::parser::RawRow;
use date::parse_date;
use speed::{normalize_speed, parse_number};

pub const COL_TIMESTAMP: &str = "Timestamp";
pub const COL_DATE: &str = "Date";
pub const COL_PROVIDER: &str = "Service Provider";
pub const COL_DOWNLOAD_MBPS: &str = "Download (Mbps)";
pub const COL_DOWNLOAD: &str = "Download";
pub const COL_UPLOAD_MBPS: &str = "Upload (Mbps)";
pub const COL_UPLOAD: &str = "Upload";
pub const COL_LATENCY_MS: &str = "Latency ( ms )";
pub const COL_LATENCY: &str = "Latency";
pub const COL_LOCATION: &str = "Location (Brgy, City)";
pub const COL_CAPITAL: &str = "Capital";
pub const COL_RANGE: &str = "Range";
pub const COL_RANGE_UPLOAD: &str = "Range (Upload)";

/// Accepted records plus how many input rows were dropped.
#[derive(Debug, Clone, Default)]
pub struct NormalizedSet {
    pub records: Vec<CanonicalRecord>,
    pub rejected: usize,
}

/// Normalizes one survey row, or `None` if the row is not acceptable.
pub fn normalize(row: &RawRow) -> Option<CanonicalRecord> {
    let raw_provider = row.get_nonempty(COL_PROVIDER)?;

    let download_mbps = row.get_nonempty(COL_DOWNLOAD_MBPS);
    let download_raw = row.get_nonempty(COL_DOWNLOAD);
    if download_mbps.is_none() && download_raw.is_none() {
        return None;
    }

    let provider = Provider::resolve(raw_provider)?;

    let download = normalize_speed(download_mbps, download_raw);
    let upload = normalize_speed(
        row.get_nonempty(COL_UPLOAD_MBPS),
        row.get_nonempty(COL_UPLOAD),
    );

    let latency = [COL_LATENCY_MS, COL_LATENCY]
        .iter()
        .find_map(|key| row.get(key).and_then(parse_number))
        .filter(|l| *l >= 0.0);

    let location = Location::parse(row.get(COL_LOCATION).unwrap_or_default())
        .with_province_override(row.get(COL_CAPITAL));

    let range_or = |key: &str, speed: f64| {
        row.get_nonempty(key)
            .map(|r| r.trim().to_string())
            .unwrap_or_else(|| SpeedBucket::classify(speed).label().to_string())
    };

    Some(CanonicalRecord {
        timestamp: row.get(COL_TIMESTAMP).unwrap_or_default().to_string(),
        date: row.get(COL_DATE).and_then(parse_date),
        provider,
        download,
        upload,
        latency,
        download_range: range_or(COL_RANGE, download),
        upload_range: range_or(COL_RANGE_UPLOAD, upload),
        barangay: location.barangay,
        city: location.city,
        province: location.province,
    })
}

/// Normalizes every row, silently dropping the ones that fail acceptance.
pub fn normalize_all(rows: &[RawRow]) -> NormalizedSet {
    let mut set = NormalizedSet::default();

    for row in rows {
        match normalize(row) {
            Some(record) => set.records.push(record),
            None => set.rejected += 1,
        }
    }

    debug!(
        accepted = set.records.len(),
        rejected = set.rejected,
        "Normalized speed test rows"
    );

    set
}
