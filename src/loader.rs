//! Loading of the dashboard's CSV sources.
//!
//! The four configured sources are fetched concurrently and independently.
//! A source that cannot be read or parsed is logged and replaced by an empty
//! dataset; it never fails the load. Manually supplied files are the
//! exception and report their errors to the caller.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::{DashboardConfig, is_url};
use crate::fetch::{BasicClient, CacheBust, HttpClient, fetch_bytes};
use crate::parser::{RawRow, parse_rows};
use crate::records::{CanonicalRecord, CityAggregate, DailySample, NormalizedSet, normalize_all};

/// Everything one load produces. Replaced wholesale on every load.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub records: Vec<CanonicalRecord>,
    /// Speed-test rows dropped by the normalizer.
    pub rejected: usize,
    pub cities: Vec<CityAggregate>,
    pub trend: Vec<CityAggregate>,
    pub daily: Vec<DailySample>,
}

impl Datasets {
    pub fn from_rows(
        speed_tests: &[RawRow],
        cities: &[RawRow],
        trend: &[RawRow],
        daily: &[RawRow],
    ) -> Self {
        let NormalizedSet { records, rejected } = normalize_all(speed_tests);

        Self {
            records,
            rejected,
            cities: cities.iter().map(CityAggregate::from_row).collect(),
            trend: trend.iter().map(CityAggregate::from_row).collect(),
            daily: daily.iter().map(DailySample::from_row).collect(),
        }
    }
}

/// Reads a source from a local path or fetches it over HTTP.
#[tracing::instrument(skip(client))]
pub async fn read_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if is_url(source) {
        fetch_bytes(client, source).await?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("Failed to read '{source}'"))?
    };
    Ok(bytes)
}

pub async fn load_rows<C: HttpClient>(client: &C, source: &str) -> Result<Vec<RawRow>> {
    let bytes = read_source(client, source).await?;
    parse_rows(&bytes).with_context(|| format!("Failed to parse '{source}'"))
}

async fn load_or_empty<C: HttpClient>(client: &C, name: &str, source: &str) -> Vec<RawRow> {
    match load_rows(client, source).await {
        Ok(rows) => {
            info!(dataset = name, source, rows = rows.len(), "Dataset loaded");
            rows
        }
        Err(e) => {
            warn!(dataset = name, source, error = %e, "Dataset unavailable, using empty set");
            Vec::new()
        }
    }
}

/// Builds the HTTP client stack for URL sources.
pub fn client_for(config: &DashboardConfig) -> Box<dyn HttpClient> {
    if config.cache_bust {
        Box::new(CacheBust::new(BasicClient::new()))
    } else {
        Box::new(BasicClient::new())
    }
}

/// Loads all four configured sources. Never fails.
#[tracing::instrument(skip_all, fields(data_dir = %config.data_dir))]
pub async fn load_all(config: &DashboardConfig) -> Datasets {
    let client = client_for(config);
    let sources = &config.sources;

    let speed_src = config.resolve(&sources.speed_tests);
    let cities_src = config.resolve(&sources.cities);
    let trend_src = config.resolve(&sources.trend);
    let daily_src = config.resolve(&sources.daily);

    let (speed_tests, cities, trend, daily) = tokio::join!(
        load_or_empty(&client, "speed_tests", &speed_src),
        load_or_empty(&client, "cities", &cities_src),
        load_or_empty(&client, "trend", &trend_src),
        load_or_empty(&client, "daily", &daily_src),
    );

    let datasets = Datasets::from_rows(&speed_tests, &cities, &trend, &daily);

    if datasets.records.is_empty() {
        info!("No speed test records available");
    }
    info!(
        records = datasets.records.len(),
        rejected = datasets.rejected,
        cities = datasets.cities.len(),
        trend = datasets.trend.len(),
        daily = datasets.daily.len(),
        "Datasets ready"
    );

    datasets
}

/// Loads a user-supplied speed-test CSV. Unlike [`load_all`], read and parse
/// failures are returned so they can be shown to the user.
pub fn load_user_file(path: &str) -> Result<NormalizedSet> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read '{path}'"))?;
    let rows = parse_rows(&bytes)
        .with_context(|| format!("Error parsing CSV file '{path}'. Please check the format."))?;
    Ok(normalize_all(&rows))
}
