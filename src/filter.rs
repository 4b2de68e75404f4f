//! Filter engine shared by the speed-test records and the city aggregates.
//!
//! All clauses are AND-combined and an unset clause always passes. Filtering
//! never mutates its input and preserves order.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::records::location::split_location_name;
use crate::records::{CanonicalRecord, CityAggregate, Provider, SpeedBucket};

/// User-selected constraints. `None`/empty fields are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterState {
    pub providers: BTreeSet<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub speed_range: Option<SpeedBucket>,
}

impl FilterState {
    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = providers.into_iter().map(Into::into).collect();
        self
    }

    pub fn allows_provider(&self, provider: &str) -> bool {
        self.providers.is_empty() || self.providers.contains(provider)
    }

    fn province(&self) -> Option<&str> {
        self.province.as_deref().filter(|p| !p.is_empty())
    }

    fn city(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| !c.is_empty())
    }

    pub fn has_date_bounds(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// Inclusive on both ends; an undated row only passes when no bound is set.
    pub fn allows_date(&self, date: Option<NaiveDate>) -> bool {
        let Some(date) = date else {
            return !self.has_date_bounds();
        };

        if self.date_from.is_some_and(|from| date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| date > to) {
            return false;
        }
        true
    }

    /// Date clause for rows covering a range of days: passes when the span
    /// overlaps the bounds. A row without a span fails once a bound is set.
    pub fn allows_span(&self, span: Option<(NaiveDate, NaiveDate)>) -> bool {
        let Some((first, last)) = span else {
            return !self.has_date_bounds();
        };

        !(self.date_from.is_some_and(|from| last < from) || self.date_to.is_some_and(|to| first > to))
    }

    pub fn allows_speed(&self, download: f64) -> bool {
        self.speed_range.is_none_or(|bucket| bucket.contains(download))
    }

    fn allows_location(&self, city: &str, province: &str) -> bool {
        if self.province().is_some_and(|p| p != province) {
            return false;
        }
        if self.city().is_some_and(|c| c != city) {
            return false;
        }
        true
    }

    pub fn matches_record(&self, record: &CanonicalRecord) -> bool {
        self.allows_provider(record.provider.as_str())
            && self.allows_location(&record.city, &record.province)
            && self.allows_date(record.date)
            && self.allows_speed(record.download)
    }

    /// Location comes from `location_name`; the provider is compared verbatim.
    /// Dates match on overlap with the row's month. The speed range is a
    /// per-test clause and does not apply to aggregate averages.
    pub fn matches_aggregate(&self, row: &CityAggregate) -> bool {
        if !self.allows_provider(&row.provider) {
            return false;
        }

        if self.province().is_some() || self.city().is_some() {
            let Some((city, province)) = split_location_name(&row.location_name) else {
                return false;
            };
            if !self.allows_location(city, province) {
                return false;
            }
        }

        self.allows_span(row.date_span())
    }
}

/// Filter key for a user-typed provider name: the canonical name when the
/// text resolves to a known carrier, otherwise the trimmed text.
pub fn canonical_provider(raw: &str) -> String {
    match Provider::resolve(raw) {
        Some(provider) => provider.as_str().to_string(),
        None => raw.trim().to_string(),
    }
}

/// Order-preserving subset of `records` matching `state`.
pub fn filter_records(records: &[CanonicalRecord], state: &FilterState) -> Vec<CanonicalRecord> {
    records
        .iter()
        .filter(|r| state.matches_record(r))
        .cloned()
        .collect()
}

/// Order-preserving subset of `rows` matching `state`.
pub fn filter_aggregates(rows: &[CityAggregate], state: &FilterState) -> Vec<CityAggregate> {
    rows.iter()
        .filter(|r| state.matches_aggregate(r))
        .cloned()
        .collect()
}

/// Choices offered by the filter panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub providers: Vec<String>,
    pub provinces: Vec<String>,
    pub cities: Vec<String>,
}

/// Providers present in `records` that are also in `allowed`, sorted.
pub fn provider_options(records: &[CanonicalRecord], allowed: &[String]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.provider.as_str())
        .filter(|p| allowed.iter().any(|a| a.as_str() == *p))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `(city, province)` pairs, preferring the aggregate dataset when loaded.
fn location_pairs<'a>(
    records: &'a [CanonicalRecord],
    cities: &'a [CityAggregate],
) -> Vec<(&'a str, &'a str)> {
    if cities.is_empty() {
        records
            .iter()
            .map(|r| (r.city.as_str(), r.province.as_str()))
            .collect()
    } else {
        cities
            .iter()
            .filter_map(|c| split_location_name(&c.location_name))
            .collect()
    }
}

pub fn province_options(records: &[CanonicalRecord], cities: &[CityAggregate]) -> Vec<String> {
    location_pairs(records, cities)
        .into_iter()
        .map(|(_, province)| province)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Cities, restricted to `province` when given.
pub fn city_options(
    records: &[CanonicalRecord],
    cities: &[CityAggregate],
    province: Option<&str>,
) -> Vec<String> {
    location_pairs(records, cities)
        .into_iter()
        .filter(|(_, p)| province.is_none_or(|want| want == *p))
        .map(|(city, _)| city)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn filter_options(
    records: &[CanonicalRecord],
    cities: &[CityAggregate],
    allowed_providers: &[String],
    province: Option<&str>,
) -> FilterOptions {
    FilterOptions {
        providers: provider_options(records, allowed_providers),
        provinces: province_options(records, cities),
        cities: city_options(records, cities, province),
    }
}
