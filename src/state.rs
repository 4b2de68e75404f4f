//! Session state and full recomputation of every derived view.
//!
//! The datasets are owned here and only ever replaced wholesale. Filter,
//! sort, and page changes go through [`AppState`] methods; [`AppState::view`]
//! recomputes filtered, aggregated, and sorted output from scratch.

use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::aggregate::{group_by_provider, market_share, rank_by_download, record_stats, summarize};
use crate::analyzers::cities::{RankingOptions, rank_cities};
use crate::analyzers::map::map_markers;
use crate::analyzers::trend::{daily_series, provider_trends};
use crate::analyzers::types::{
    CityRankings, DailyPoint, MapLayer, MarketShare, ProviderGroup, ProviderTrends, RecordStats, Summary,
};
use crate::config::DashboardConfig;
use crate::filter::{FilterOptions, FilterState, filter_aggregates, filter_options, filter_records, provider_options};
use crate::loader::Datasets;
use crate::records::CanonicalRecord;
use crate::sorter::{SortColumn, SortState, sort_records};

/// Everything the presentation layer renders for one filter state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    pub filters: FilterState,
    pub summary: Summary,
    pub record_stats: RecordStats,
    pub providers: Vec<ProviderGroup>,
    pub provider_ranking: Vec<ProviderGroup>,
    pub cities: CityRankings,
    pub market_share: Vec<MarketShare>,
    pub trends: ProviderTrends,
    pub time_series: Vec<DailyPoint>,
    pub map: MapLayer,
    pub records: Vec<CanonicalRecord>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    datasets: Datasets,
    pub filters: FilterState,
    pub sort: SortState,
    page: usize,
    rows_per_page: usize,
    default_providers: Vec<String>,
    ranking: RankingOptions,
}

impl AppState {
    pub fn new(datasets: Datasets, config: &DashboardConfig) -> Self {
        let mut state = Self {
            datasets,
            filters: FilterState::default(),
            sort: SortState::default(),
            page: 1,
            rows_per_page: config.rows_per_page.max(1),
            default_providers: config.default_providers.clone(),
            ranking: config.ranking(),
        };
        state.reset_filters();
        state
    }

    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    /// Swaps in freshly loaded data. Filters and sort order are kept.
    pub fn replace_datasets(&mut self, datasets: Datasets) {
        self.datasets = datasets;
        self.page = 1;
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        debug!(?filters, "Applying filters");
        self.filters = filters;
        self.page = 1;
    }

    /// Default providers present in the data; everything else unconstrained.
    pub fn reset_filters(&mut self) {
        let providers = provider_options(&self.datasets.records, &self.default_providers);
        self.set_filters(FilterState::default().with_providers(providers));
    }

    /// Choosing a province always clears the city.
    pub fn select_province(&mut self, province: Option<String>) {
        let mut filters = self.filters.clone();
        filters.province = province;
        filters.city = None;
        self.set_filters(filters);
    }

    pub fn filter_options(&self) -> FilterOptions {
        filter_options(
            &self.datasets.records,
            &self.datasets.cities,
            &self.default_providers,
            self.filters.province.as_deref().filter(|p| !p.is_empty()),
        )
    }

    /// Applies a column click. Unknown column names leave the order untouched.
    pub fn sort_by(&mut self, column: &str) {
        match column.parse::<SortColumn>() {
            Ok(column) => {
                self.sort.select(column);
                info!(column = ?self.sort.column, direction = ?self.sort.direction, "Sort changed");
            }
            Err(e) => debug!(error = %e, "Ignoring sort request"),
        }
    }

    /// Filtered records in the current sort order.
    pub fn sorted_records(&self) -> Vec<CanonicalRecord> {
        let mut records = filter_records(&self.datasets.records, &self.filters);
        sort_records(&mut records, self.sort.column, self.sort.direction);
        records
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        let total = filter_records(&self.datasets.records, &self.filters).len();
        total.div_ceil(self.rows_per_page)
    }

    pub fn next_page(&mut self) {
        if self.page < self.page_count() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Jumps to `page`, clamped to the available pages.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count().max(1));
    }

    /// The current page of sorted, filtered records.
    pub fn page_rows(&self) -> Vec<CanonicalRecord> {
        self.sorted_records()
            .into_iter()
            .skip((self.page - 1) * self.rows_per_page)
            .take(self.rows_per_page)
            .collect()
    }

    /// Recomputes every derived view from the datasets and current filters.
    pub fn view(&self) -> DashboardView {
        let cities = filter_aggregates(&self.datasets.cities, &self.filters);
        let records = self.sorted_records();
        let providers = group_by_provider(&cities);

        DashboardView {
            filters: self.filters.clone(),
            summary: summarize(&cities),
            record_stats: record_stats(&records),
            provider_ranking: rank_by_download(providers.clone()),
            providers,
            cities: rank_cities(&cities, self.ranking),
            market_share: market_share(&cities),
            trends: provider_trends(&self.datasets.trend, &self.filters),
            time_series: daily_series(&self.datasets.daily),
            map: map_markers(&cities),
            records,
        }
    }
}
