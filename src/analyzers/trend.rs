//! Time-based views: the monthly per-provider trend and the daily series.

use crate::analyzers::types::{DailyPoint, ProviderSeries, ProviderTrends};
use crate::analyzers::utility::mean;
use crate::filter::FilterState;
use crate::records::{CityAggregate, DailySample, Provider};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Builds aligned per-provider series from the monthly aggregate dataset.
///
/// Unlike the city filters, the provider clause here compares the
/// alias-resolved provider name. Dates and providers keep first-seen order,
/// and a provider without a row for a date gets `None` at that slot.
pub fn provider_trends(rows: &[CityAggregate], state: &FilterState) -> ProviderTrends {
    let valid: Vec<&CityAggregate> = rows
        .iter()
        .filter(|r| !r.provider.is_empty() && !r.aggregate_date.is_empty())
        .filter(|r| {
            state.providers.is_empty()
                || Provider::resolve(&r.provider).is_some_and(|p| state.allows_provider(p.as_str()))
        })
        .filter(|r| state.allows_span(r.date_span()))
        .collect();

    let mut dates: Vec<&str> = Vec::new();
    let mut providers: Vec<&str> = Vec::new();
    for row in valid.iter().copied() {
        if !dates.contains(&row.aggregate_date.as_str()) {
            dates.push(&row.aggregate_date);
        }
        if !providers.contains(&row.provider.as_str()) {
            providers.push(&row.provider);
        }
    }

    let series = providers
        .iter()
        .map(|provider| {
            let entries: Vec<Option<&CityAggregate>> = dates
                .iter()
                .map(|date| {
                    valid
                        .iter()
                        .find(|r| r.provider == *provider && r.aggregate_date == *date)
                        .copied()
                })
                .collect();

            ProviderSeries {
                provider: provider.to_string(),
                download: entries.iter().map(|e| e.and_then(|r| r.download_speed_mbps)).collect(),
                upload: entries.iter().map(|e| e.and_then(|r| r.upload_speed_mbps)).collect(),
                latency: entries.iter().map(|e| e.and_then(|r| r.multi_server_latency)).collect(),
            }
        })
        .collect();

    ProviderTrends {
        dates: dates.into_iter().map(str::to_string).collect(),
        series,
    }
}

/// Per-day mean download and upload, ordered by date.
///
/// Each daily row is one raw sample, so the means are plain arithmetic
/// means and must not be weighted by test count.
pub fn daily_series(samples: &[DailySample]) -> Vec<DailyPoint> {
    let mut days: BTreeMap<NaiveDate, (Vec<f64>, Vec<f64>)> = BTreeMap::new();

    for sample in samples {
        let Some(date) = sample.date else {
            continue;
        };

        let (downloads, uploads) = days.entry(date).or_default();
        downloads.extend(sample.download);
        uploads.extend(sample.upload);
    }

    days.into_iter()
        .map(|(date, (downloads, uploads))| DailyPoint {
            date,
            avg_download: mean(&downloads),
            avg_upload: mean(&uploads),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly(provider: &str, date: &str, download: f64) -> CityAggregate {
        CityAggregate {
            provider: provider.to_string(),
            aggregate_date: date.to_string(),
            download_speed_mbps: Some(download),
            upload_speed_mbps: Some(download / 4.0),
            multi_server_latency: Some(40.0),
            ..Default::default()
        }
    }

    fn daily(date: &str, download: Option<f64>, upload: Option<f64>) -> DailySample {
        DailySample {
            date: crate::records::date::parse_date(date),
            download,
            upload,
        }
    }

    #[test]
    fn test_series_align_with_dates() {
        let rows = vec![
            monthly("Smart", "Jun-25", 30.0),
            monthly("Globe", "Jun-25", 20.0),
            monthly("Smart", "Jul-25", 32.0),
        ];

        let trends = provider_trends(&rows, &FilterState::default());
        assert_eq!(trends.dates, vec!["Jun-25", "Jul-25"]);
        assert_eq!(trends.series.len(), 2);
        assert_eq!(trends.series[0].provider, "Smart");
        assert_eq!(trends.series[0].download, vec![Some(30.0), Some(32.0)]);
        assert_eq!(trends.series[1].download, vec![Some(20.0), None]);
        assert_eq!(trends.series[1].latency, vec![Some(40.0), None]);
    }

    #[test]
    fn test_trend_provider_filter_uses_aliases() {
        let rows = vec![
            monthly("Smart Communications", "Jun-25", 30.0),
            monthly("Globe Telecom", "Jun-25", 20.0),
            monthly("Unknown Mobile", "Jun-25", 10.0),
        ];
        let state = FilterState::default().with_providers(["Smart"]);

        let trends = provider_trends(&rows, &state);
        assert_eq!(trends.series.len(), 1);
        assert_eq!(trends.series[0].provider, "Smart Communications");
    }

    #[test]
    fn test_trend_date_bounds_fail_closed() {
        let rows = vec![
            monthly("Smart", "Jun-25", 30.0),
            monthly("Smart", "Aug-25", 31.0),
            monthly("Smart", "sometime", 99.0),
        ];

        let unbounded = provider_trends(&rows, &FilterState::default());
        assert_eq!(unbounded.dates.len(), 3);

        let state = FilterState {
            date_from: NaiveDate::from_ymd_opt(2025, 7, 1),
            ..Default::default()
        };
        let bounded = provider_trends(&rows, &state);
        assert_eq!(bounded.dates, vec!["Aug-25"]);

        let mid_month = FilterState {
            date_from: NaiveDate::from_ymd_opt(2025, 8, 15),
            ..Default::default()
        };
        assert_eq!(provider_trends(&rows, &mid_month).dates, vec!["Aug-25"]);
    }

    #[test]
    fn test_daily_series_is_unweighted_mean() {
        let samples = vec![
            daily("Oct 27, 2025", Some(10.0), Some(2.0)),
            daily("Oct 26, 2025", Some(10.0), Some(1.0)),
            daily("Oct 26, 2025", Some(30.0), None),
            daily("garbage", Some(1000.0), Some(1000.0)),
        ];

        let points = daily_series(&samples);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2025, 10, 26).unwrap());
        assert_eq!(points[0].avg_download, 20.0);
        assert_eq!(points[0].avg_upload, 1.0);
        assert_eq!(points[1].avg_download, 10.0);
    }
}
