//! Table ordering for canonical records.

use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::records::CanonicalRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Date,
    Provider,
    Download,
    Upload,
    Latency,
    Location,
}

impl FromStr for SortColumn {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortColumn::Date),
            "provider" => Ok(SortColumn::Provider),
            "download" => Ok(SortColumn::Download),
            "upload" => Ok(SortColumn::Upload),
            "latency" => Ok(SortColumn::Latency),
            "location" => Ok(SortColumn::Location),
            other => Err(anyhow::anyhow!("Unknown sort column '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Current table ordering. Starts at newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::Date,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    /// Re-selecting the current column flips direction; a new column starts ascending.
    pub fn select(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = self.direction.flip();
        } else {
            self.column = column;
            self.direction = SortDirection::Asc;
        }
    }
}

/// Days since the Unix epoch, with undated records at zero.
fn date_key(r: &CanonicalRecord) -> i64 {
    r.date
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0)
}

fn location_key(r: &CanonicalRecord) -> String {
    format!("{}{}", r.city, r.province)
}

fn compare(a: &CanonicalRecord, b: &CanonicalRecord, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Date => date_key(a).cmp(&date_key(b)),
        SortColumn::Provider => a.provider.as_str().cmp(b.provider.as_str()),
        SortColumn::Download => a.download.total_cmp(&b.download),
        SortColumn::Upload => a.upload.total_cmp(&b.upload),
        SortColumn::Latency => a.latency.unwrap_or(0.0).total_cmp(&b.latency.unwrap_or(0.0)),
        SortColumn::Location => location_key(a).cmp(&location_key(b)),
    }
}

/// Sorts `records` in place by `column` in `direction`.
pub fn sort_records(records: &mut [CanonicalRecord], column: SortColumn, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ord = compare(a, b, column);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Provider;

    fn rec(provider: Provider, download: f64, latency: Option<f64>, date: Option<&str>, city: &str) -> CanonicalRecord {
        CanonicalRecord {
            timestamp: String::new(),
            date: date.map(|d| d.parse().unwrap()),
            provider,
            download,
            upload: download / 2.0,
            latency,
            download_range: String::new(),
            upload_range: String::new(),
            barangay: String::new(),
            city: city.to_string(),
            province: "P".to_string(),
        }
    }

    fn downloads(records: &[CanonicalRecord]) -> Vec<f64> {
        records.iter().map(|r| r.download).collect()
    }

    #[test]
    fn test_select_same_column_flips() {
        let mut state = SortState::default();
        state.select(SortColumn::Download);
        assert_eq!(state.direction, SortDirection::Asc);
        state.select(SortColumn::Download);
        assert_eq!(state.direction, SortDirection::Desc);
        state.select(SortColumn::Upload);
        assert_eq!(state.column, SortColumn::Upload);
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_by_download_both_directions() {
        let mut records = vec![
            rec(Provider::Smart, 20.0, None, None, "B"),
            rec(Provider::Globe, 5.0, None, None, "A"),
            rec(Provider::Dito, 80.0, None, None, "C"),
        ];

        sort_records(&mut records, SortColumn::Download, SortDirection::Asc);
        assert_eq!(downloads(&records), vec![5.0, 20.0, 80.0]);

        sort_records(&mut records, SortColumn::Download, SortDirection::Desc);
        assert_eq!(downloads(&records), vec![80.0, 20.0, 5.0]);
    }

    #[test]
    fn test_undated_sorts_as_epoch() {
        let mut records = vec![
            rec(Provider::Smart, 1.0, None, Some("2025-10-01"), "A"),
            rec(Provider::Smart, 2.0, None, None, "A"),
            rec(Provider::Smart, 3.0, None, Some("1969-12-31"), "A"),
        ];

        sort_records(&mut records, SortColumn::Date, SortDirection::Asc);
        assert_eq!(downloads(&records), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_missing_latency_sorts_as_zero() {
        let mut records = vec![
            rec(Provider::Smart, 1.0, Some(50.0), None, "A"),
            rec(Provider::Smart, 2.0, None, None, "A"),
            rec(Provider::Smart, 3.0, Some(10.0), None, "A"),
        ];

        sort_records(&mut records, SortColumn::Latency, SortDirection::Asc);
        assert_eq!(downloads(&records), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_sort_by_provider_and_location() {
        let mut records = vec![
            rec(Provider::Smart, 1.0, None, None, "Cebu"),
            rec(Provider::Dito, 2.0, None, None, "Makati"),
            rec(Provider::Globe, 3.0, None, None, "Antipolo"),
        ];

        sort_records(&mut records, SortColumn::Provider, SortDirection::Asc);
        assert_eq!(downloads(&records), vec![2.0, 3.0, 1.0]);

        sort_records(&mut records, SortColumn::Location, SortDirection::Asc);
        assert_eq!(downloads(&records), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_parse_column_names() {
        assert_eq!("Download".parse::<SortColumn>().unwrap(), SortColumn::Download);
        assert!("speed".parse::<SortColumn>().is_err());
    }
}
