//! Typed rows produced by the normalizer.

use chrono::{Months, NaiveDate};
use serde::Serialize;

use super::bucket::SpeedTier;
use super::date::{parse_aggregate_date, parse_date, parse_month_year};
use super::provider::Provider;
use super::speed::{parse_count, parse_number};
use crate::parser::RawRow;

/// One observed speed test after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub timestamp: String,
    pub date: Option<NaiveDate>,
    pub provider: Provider,
    pub download: f64,
    pub upload: f64,
    pub latency: Option<f64>,
    pub download_range: String,
    pub upload_range: String,
    pub barangay: String,
    pub city: String,
    pub province: String,
}

impl CanonicalRecord {
    /// Colour band for the table row.
    pub fn tier(&self) -> SpeedTier {
        SpeedTier::classify(self.download)
    }
}

/// One row of a pre-aggregated location/provider dataset.
///
/// Used for both the per-city dataset and the monthly provider trend
/// dataset, which share the same columns. `provider` is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CityAggregate {
    pub location_name: String,
    pub provider: String,
    pub test_count: u64,
    pub download_speed_mbps: Option<f64>,
    pub upload_speed_mbps: Option<f64>,
    pub minimum_latency: Option<f64>,
    pub multi_server_latency: Option<f64>,
    pub aggregate_date: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CityAggregate {
    pub fn from_row(row: &RawRow) -> Self {
        let text = |key: &str| row.get(key).map(|v| v.trim().to_string()).unwrap_or_default();
        let number = |key: &str| row.get(key).and_then(parse_number);

        Self {
            location_name: text("Location Name"),
            provider: text("Provider"),
            test_count: row.get("Test Count").map(parse_count).unwrap_or(0),
            download_speed_mbps: number("Download Speed Mbps"),
            upload_speed_mbps: number("Upload Speed Mbps"),
            minimum_latency: number("Minimum Latency"),
            multi_server_latency: number("Multi-Server Latency"),
            aggregate_date: text("Aggregate Date"),
            latitude: number("Latitude").or_else(|| number("latitude")),
            longitude: number("Longitude").or_else(|| number("longitude")),
        }
    }

    /// Parsed `aggregate_date`, monthly labels included.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_aggregate_date(&self.aggregate_date)
    }

    /// First and last day covered by the row. A monthly label spans the
    /// whole month; a full date spans that one day.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        if let Some(first) = parse_month_year(&self.aggregate_date) {
            let last = first
                .checked_add_months(Months::new(1))
                .and_then(|d| d.pred_opt())
                .unwrap_or(first);
            return Some((first, last));
        }
        parse_date(&self.aggregate_date).map(|d| (d, d))
    }

    /// Download speed, with unparseable values read as zero.
    pub fn download(&self) -> f64 {
        self.download_speed_mbps.unwrap_or(0.0)
    }

    pub fn upload(&self) -> f64 {
        self.upload_speed_mbps.unwrap_or(0.0)
    }
}

/// One row of the daily time-series dataset: a single raw sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailySample {
    pub date: Option<NaiveDate>,
    pub download: Option<f64>,
    pub upload: Option<f64>,
}

impl DailySample {
    pub fn from_row(row: &RawRow) -> Self {
        let date = row
            .get_nonempty("Aggregate Date")
            .or_else(|| row.get_nonempty("aggregate date"))
            .and_then(parse_date);

        Self {
            date,
            download: row.get("Download Speed Mbps").and_then(parse_number),
            upload: row.get("Upload Speed Mbps").and_then(parse_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_aggregate_from_row() {
        let row: RawRow = [
            ("Location Name", "Quezon City, Metro Manila, Philippines"),
            ("Provider", "Smart"),
            ("Test Count", "120"),
            (" Download Speed Mbps", "35.2"),
            ("Upload Speed Mbps", "8.1"),
            ("Minimum Latency", "18"),
            ("Multi-Server Latency", "n/a"),
            ("Aggregate Date", "Jun-25"),
            ("Latitude", "14.676"),
            ("Longitude", "121.0437"),
        ]
        .into_iter()
        .collect();

        let agg = CityAggregate::from_row(&row);
        assert_eq!(agg.provider, "Smart");
        assert_eq!(agg.test_count, 120);
        assert_eq!(agg.download_speed_mbps, Some(35.2));
        assert_eq!(agg.multi_server_latency, None);
        assert_eq!(agg.latitude, Some(14.676));
        assert_eq!(agg.date(), NaiveDate::from_ymd_opt(2025, 6, 1));
    }

    #[test]
    fn test_city_aggregate_missing_columns_degrade() {
        let agg = CityAggregate::from_row(&RawRow::default());
        assert_eq!(agg.test_count, 0);
        assert_eq!(agg.download(), 0.0);
        assert!(agg.location_name.is_empty());
        assert_eq!(agg.date(), None);
    }

    #[test]
    fn test_daily_sample_from_row() {
        let row: RawRow = [
            ("Aggregate Date", "Oct 26, 2025"),
            ("Download Speed Mbps", "20"),
            ("Upload Speed Mbps", ""),
        ]
        .into_iter()
        .collect();

        let sample = DailySample::from_row(&row);
        assert_eq!(sample.date, NaiveDate::from_ymd_opt(2025, 10, 26));
        assert_eq!(sample.download, Some(20.0));
        assert_eq!(sample.upload, None);
    }

    #[test]
    fn test_record_tier() {
        let record = CanonicalRecord {
            timestamp: String::new(),
            date: None,
            provider: Provider::Globe,
            download: 12.0,
            upload: 2.0,
            latency: None,
            download_range: "10-20".to_string(),
            upload_range: "1-2".to_string(),
            barangay: String::new(),
            city: String::new(),
            province: String::new(),
        };
        assert_eq!(record.tier(), SpeedTier::Good);
    }

    #[test]
    fn test_date_span() {
        let month = CityAggregate {
            aggregate_date: "Feb-24".to_string(),
            ..Default::default()
        };
        assert_eq!(
            month.date_span(),
            Some((
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
            ))
        );

        let day = CityAggregate {
            aggregate_date: "2025-10-26".to_string(),
            ..Default::default()
        };
        let d = NaiveDate::from_ymd_opt(2025, 10, 26).unwrap();
        assert_eq!(day.date_span(), Some((d, d)));
        assert_eq!(CityAggregate::default().date_span(), None);
    }
}
