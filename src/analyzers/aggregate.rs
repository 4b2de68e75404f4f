use crate::analyzers::types::{MarketShare, ProviderGroup, RecordStats, Summary};
use crate::analyzers::utility::{mean, share, Weighted};
use crate::records::{CanonicalRecord, CityAggregate};
use std::collections::BTreeMap;

/// Test-count-weighted summary over aggregate rows.
///
/// Latency is weighted from the `Minimum Latency` column. Every average is
/// 0.0 when the rows carry no tests at all.
pub fn summarize(rows: &[CityAggregate]) -> Summary {
    let mut download = Weighted::default();
    let mut upload = Weighted::default();
    let mut latency = Weighted::default();

    for row in rows {
        download.add(row.download(), row.test_count);
        upload.add(row.upload(), row.test_count);
        latency.add(row.minimum_latency.unwrap_or(0.0), row.test_count);
    }

    Summary {
        total_tests: download.weight,
        avg_download: download.mean(),
        avg_upload: upload.mean(),
        avg_latency: latency.mean(),
    }
}

/// Plain per-record statistics, where every record counts once.
pub fn record_stats(records: &[CanonicalRecord]) -> RecordStats {
    if records.is_empty() {
        return RecordStats::default();
    }

    let downloads: Vec<f64> = records.iter().map(|r| r.download).collect();
    let uploads: Vec<f64> = records.iter().map(|r| r.upload).collect();
    let latencies: Vec<f64> = records.iter().filter_map(|r| r.latency).collect();

    RecordStats {
        total_tests: records.len(),
        avg_download: mean(&downloads),
        avg_upload: mean(&uploads),
        avg_latency: (!latencies.is_empty()).then(|| mean(&latencies)),
    }
}

/// Weighted download/upload per provider, ordered by provider name.
pub fn group_by_provider(rows: &[CityAggregate]) -> Vec<ProviderGroup> {
    let mut groups: BTreeMap<&str, (Weighted, Weighted)> = BTreeMap::new();

    for row in rows.iter().filter(|r| !r.provider.is_empty()) {
        let (download, upload) = groups.entry(row.provider.as_str()).or_default();
        download.add(row.download(), row.test_count);
        upload.add(row.upload(), row.test_count);
    }

    groups
        .into_iter()
        .map(|(provider, (download, upload))| ProviderGroup {
            provider: provider.to_string(),
            total_tests: download.weight,
            avg_download: download.mean(),
            avg_upload: upload.mean(),
        })
        .collect()
}

/// Re-orders provider groups fastest download first. Ties keep their
/// incoming (name) order.
pub fn rank_by_download(mut groups: Vec<ProviderGroup>) -> Vec<ProviderGroup> {
    groups.sort_by(|a, b| b.avg_download.total_cmp(&a.avg_download));
    groups
}

/// Each provider's share of all tests, ordered by provider name. Providers
/// without any tests are left out.
pub fn market_share(rows: &[CityAggregate]) -> Vec<MarketShare> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();

    for row in rows {
        if row.provider.is_empty() || row.test_count == 0 {
            continue;
        }
        let count = counts.entry(row.provider.as_str()).or_default();
        *count = count.saturating_add(row.test_count);
    }

    let total = counts.values().fold(0u64, |acc, n| acc.saturating_add(*n));

    counts
        .into_iter()
        .map(|(provider, tests)| MarketShare {
            provider: provider.to_string(),
            tests,
            share: share(tests, total),
        })
        .collect()
}
