//! CSV parser for dashboard sources.
//!
//! Every source is a headered CSV file; each data line becomes a [`RawRow`]
//! mapping header to cell text. Typing happens later in [`crate::records`].

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;

/// One CSV line keyed by its column header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow(HashMap<String, String>);

impl RawRow {
    /// Returns the value for `key`, falling back to a header whose trimmed
    /// form equals `key` (exports often carry stray spaces around headers).
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(v) = self.0.get(key) {
            return Some(v.as_str());
        }

        self.0
            .iter()
            .find(|(k, _)| k.trim() == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`RawRow::get`], but whitespace-only values count as missing.
    pub fn get_nonempty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawRow(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Decodes headered CSV bytes into raw rows.
///
/// Short lines are tolerated (missing cells are simply absent) and blank
/// lines are skipped.
///
/// # Errors
///
/// Returns an error if the header line or any record is not valid CSV/UTF-8.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Malformed CSV record {}", line + 1))?;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.as_str(), v))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}
