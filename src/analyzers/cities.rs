use crate::analyzers::types::{CityRank, CityRankings};
use crate::analyzers::utility::Weighted;
use crate::records::location::city_of;
use crate::records::CityAggregate;
use std::collections::BTreeMap;

/// Cities with fewer summed tests than this are left out of both rankings.
pub const MIN_CITY_TESTS: u64 = 20;
pub const TOP_CITIES: usize = 15;
pub const LOWEST_CITIES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingOptions {
    pub min_tests: u64,
    pub top: usize,
    pub lowest: usize,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            min_tests: MIN_CITY_TESTS,
            top: TOP_CITIES,
            lowest: LOWEST_CITIES,
        }
    }
}

/// Rows whose location name has no city part are grouped under this name.
pub const UNKNOWN_CITY: &str = "Unknown";

/// Weighted average download per city, for cities meeting the test floor.
///
/// The city is the text before the first comma of `location_name`, or
/// [`UNKNOWN_CITY`] when that is empty. A missing download counts as 0 Mbps.
/// Rows with zero tests carry no weight and are skipped. Output is ordered
/// by city name.
pub fn city_averages(rows: &[CityAggregate], min_tests: u64) -> Vec<CityRank> {
    let mut cities: BTreeMap<&str, Weighted> = BTreeMap::new();

    for row in rows {
        if row.test_count == 0 {
            continue;
        }
        let name = match city_of(&row.location_name) {
            "" => UNKNOWN_CITY,
            name => name,
        };

        cities.entry(name).or_default().add(row.download(), row.test_count);
    }

    cities
        .into_iter()
        .filter(|(_, w)| w.weight >= min_tests)
        .map(|(name, w)| CityRank {
            name: name.to_string(),
            avg_speed: w.mean(),
            test_count: w.weight,
        })
        .collect()
}

/// Fastest and slowest cities, each list truncated independently.
pub fn rank_cities(rows: &[CityAggregate], opts: RankingOptions) -> CityRankings {
    let cities = city_averages(rows, opts.min_tests);

    let mut top = cities.clone();
    top.sort_by(|a, b| b.avg_speed.total_cmp(&a.avg_speed));
    top.truncate(opts.top);

    let mut lowest = cities;
    lowest.sort_by(|a, b| a.avg_speed.total_cmp(&b.avg_speed));
    lowest.truncate(opts.lowest);

    CityRankings { top, lowest }
}
