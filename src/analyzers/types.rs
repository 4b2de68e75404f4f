//! Output shapes handed to the presentation layer.

use chrono::NaiveDate;
use serde::Serialize;

use crate::records::SpeedTier;

/// Headline numbers for the summary cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_tests: u64,
    pub avg_download: f64,
    pub avg_upload: f64,
    pub avg_latency: f64,
}

/// Unweighted statistics over canonical speed-test records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordStats {
    pub total_tests: usize,
    pub avg_download: f64,
    pub avg_upload: f64,
    pub avg_latency: Option<f64>,
}

/// Weighted averages for one provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderGroup {
    pub provider: String,
    pub total_tests: u64,
    pub avg_download: f64,
    pub avg_upload: f64,
}

/// Weighted average download for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRank {
    pub name: String,
    pub avg_speed: f64,
    pub test_count: u64,
}

/// Best and worst cities among those with enough samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CityRankings {
    pub top: Vec<CityRank>,
    pub lowest: Vec<CityRank>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketShare {
    pub provider: String,
    pub tests: u64,
    pub share: f64,
}

/// Mean download/upload for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub avg_download: f64,
    pub avg_upload: f64,
}

/// One provider's monthly values, aligned with [`ProviderTrends::dates`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSeries {
    pub provider: String,
    pub download: Vec<Option<f64>>,
    pub upload: Vec<Option<f64>>,
    pub latency: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProviderTrends {
    pub dates: Vec<String>,
    pub series: Vec<ProviderSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub provider: String,
    pub location: String,
    pub download: f64,
    pub upload: f64,
    pub tier: SpeedTier,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapLayer {
    pub markers: Vec<MapMarker>,
    pub skipped: usize,
}
