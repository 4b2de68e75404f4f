use mno_perf::config::DashboardConfig;
use mno_perf::loader::{Datasets, load_all, load_user_file};
use mno_perf::output::export_records;
use mno_perf::parser::parse_rows;
use mno_perf::records::{Provider, SpeedBucket};
use mno_perf::sorter::SortDirection;
use mno_perf::state::AppState;

fn fixture_datasets() -> Datasets {
    let speed = parse_rows(include_bytes!("fixtures/speed_test_data.csv")).expect("speed tests");
    let cities = parse_rows(include_bytes!("fixtures/other_data_cities.csv")).expect("cities");
    let trend = parse_rows(include_bytes!("fixtures/other_data.csv")).expect("trend");
    let daily = parse_rows(include_bytes!("fixtures/other_data_daily.csv")).expect("daily");

    Datasets::from_rows(&speed, &cities, &trend, &daily)
}

fn fixture_state() -> AppState {
    AppState::new(fixture_datasets(), &DashboardConfig::default())
}

#[test]
fn test_normalization_drops_unknown_and_incomplete_rows() {
    let datasets = fixture_datasets();

    assert_eq!(datasets.records.len(), 4);
    assert_eq!(datasets.rejected, 2);

    let smart = &datasets.records[0];
    assert_eq!(smart.provider, Provider::Smart);
    assert_eq!(smart.download, 50.0);
    assert_eq!(smart.city, "Makati");

    let globe = &datasets.records[1];
    assert_eq!(globe.provider, Provider::Globe);
    assert!((globe.download - 20.48).abs() < 1e-9);
    assert_eq!(globe.download_range, SpeedBucket::classify(20.48).label());
}

#[test]
fn test_default_view() {
    let view = fixture_state().view();

    // TNT is outside the default provider set.
    assert_eq!(view.records.len(), 3);
    assert_eq!(view.summary.total_tests, 70);

    let tests: Vec<_> = view.market_share.iter().map(|m| (m.provider.as_str(), m.tests)).collect();
    assert_eq!(tests, vec![("DITO", 30), ("Globe", 25), ("Smart", 15)]);
    let total_share: f64 = view.market_share.iter().map(|m| m.share).sum();
    assert!((total_share - 1.0).abs() < 1e-9);

    assert_eq!(view.map.markers.len(), 4);
    assert_eq!(view.map.skipped, 1);
}

#[test]
fn test_city_ranking_applies_test_floor() {
    let view = fixture_state().view();

    let top: Vec<_> = view.cities.top.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(top, vec!["Alpha", "Gamma"]);
    assert!(!view.cities.lowest.iter().any(|c| c.name == "Beta"));
    assert_eq!(view.cities.top[0].avg_speed, 24.0);
    assert_eq!(view.cities.top[0].test_count, 25);
}

#[test]
fn test_trends_and_daily_series() {
    let view = fixture_state().view();

    assert_eq!(view.trends.dates, vec!["Jun-25", "Jul-25"]);
    let providers: Vec<_> = view.trends.series.iter().map(|s| s.provider.as_str()).collect();
    assert_eq!(providers, vec!["Smart", "Globe", "DITO"]);
    assert_eq!(view.trends.series[2].download, vec![Some(40.1), None]);

    assert_eq!(view.time_series.len(), 2);
    assert_eq!(view.time_series[0].avg_download, 15.0);
    assert_eq!(view.time_series[0].avg_upload, 3.0);
    assert_eq!(view.time_series[1].avg_download, 30.0);
}

#[test]
fn test_table_sort_toggle() {
    let mut state = fixture_state();

    state.sort_by("download");
    let asc: Vec<_> = state.sorted_records().iter().map(|r| r.provider).collect();
    assert_eq!(asc, vec![Provider::Globe, Provider::Smart, Provider::Dito]);

    state.sort_by("download");
    assert_eq!(state.sort.direction, SortDirection::Desc);
    let desc: Vec<_> = state.sorted_records().iter().map(|r| r.provider).collect();
    assert_eq!(desc, vec![Provider::Dito, Provider::Smart, Provider::Globe]);

    state.sort_by("signal strength");
    let unchanged: Vec<_> = state.sorted_records().iter().map(|r| r.provider).collect();
    assert_eq!(unchanged, desc);
}

#[test]
fn test_filters_and_options() {
    let mut state = fixture_state();

    let mut filters = state.filters.clone();
    filters.date_from = Some("2025-10-02".parse().unwrap());
    state.set_filters(filters);
    assert_eq!(state.sorted_records().len(), 2);

    state.select_province(Some("Province B".to_string()));
    let options = state.filter_options();
    assert_eq!(options.providers, vec!["DITO", "Globe", "Smart"]);
    assert_eq!(options.provinces, vec!["Province A", "Province B", "Province C"]);
    assert_eq!(options.cities, vec!["Beta", "Gamma"]);

    // "Oct-25" covers the whole month, so a mid-month bound keeps it.
    assert_eq!(state.view().summary.total_tests, 45);

    let mut filters = state.filters.clone();
    filters.date_from = Some("2025-11-01".parse().unwrap());
    state.set_filters(filters);
    assert_eq!(state.view().summary.total_tests, 0);
}

#[test]
fn test_speed_range_leaves_aggregate_views_intact() {
    let mut state = fixture_state();

    let mut filters = state.filters.clone();
    filters.speed_range = Some(SpeedBucket::From100);
    state.set_filters(filters);

    assert!(state.sorted_records().is_empty());
    assert_eq!(state.view().summary.total_tests, 70);
}

#[test]
fn test_export_reloads_as_speed_tests() {
    let state = fixture_state();
    let path = format!("{}/mno_perf_integration_export.csv", std::env::temp_dir().display());
    let _ = std::fs::remove_file(&path);

    let records = state.sorted_records();
    export_records(&path, &records, false).unwrap();

    let reloaded = load_user_file(&path).unwrap();
    assert_eq!(reloaded.rejected, 0);
    assert_eq!(reloaded.records, records);

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_load_all_from_data_dir() {
    let config = DashboardConfig {
        data_dir: format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR")),
        ..Default::default()
    };

    let datasets = load_all(&config).await;
    assert_eq!(datasets.records.len(), 4);
    assert_eq!(datasets.cities.len(), 6);
    assert_eq!(datasets.trend.len(), 6);
    assert_eq!(datasets.daily.len(), 3);
}
