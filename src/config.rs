//! Dashboard configuration.
//!
//! Stored as a JSON object on disk; every key is optional:
//! ```json
//! {
//!   "data_dir": "data",
//!   "sources": { "speed_tests": "speed_test_data.csv", "cities": "https://example.org/cities.csv" },
//!   "rows_per_page": 50,
//!   "city_min_tests": 20
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analyzers::cities::{LOWEST_CITIES, MIN_CITY_TESTS, RankingOptions, TOP_CITIES};

pub const DATA_DIR_ENV: &str = "MNO_DATA_DIR";

/// Locations of the four CSV sources. Each is a file name relative to
/// `data_dir`, an absolute path, or an `http(s)` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sources {
    pub speed_tests: String,
    pub cities: String,
    pub trend: String,
    pub daily: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            speed_tests: "speed_test_data.csv".to_string(),
            cities: "other_data_cities.csv".to_string(),
            trend: "other_data.csv".to_string(),
            daily: "other_data_daily.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: String,
    pub sources: Sources,
    /// Append a `v=<millis>` query parameter to URL sources.
    pub cache_bust: bool,
    pub rows_per_page: usize,
    pub city_min_tests: u64,
    pub top_cities: usize,
    pub lowest_cities: usize,
    pub default_providers: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            sources: Sources::default(),
            cache_bust: true,
            rows_per_page: 50,
            city_min_tests: MIN_CITY_TESTS,
            top_cities: TOP_CITIES,
            lowest_cities: LOWEST_CITIES,
            default_providers: vec!["DITO".to_string(), "Globe".to_string(), "Smart".to_string()],
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file '{path}'"))?;
        Ok(config)
    }

    /// Applies `MNO_DATA_DIR` if it is set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.data_dir = dir;
            }
        }
        self
    }

    /// Resolves a configured source against `data_dir`.
    pub fn resolve(&self, source: &str) -> String {
        if is_url(source) || Path::new(source).is_absolute() {
            source.to_string()
        } else if is_url(&self.data_dir) {
            format!("{}/{}", self.data_dir.trim_end_matches('/'), source)
        } else {
            Path::new(&self.data_dir).join(source).display().to_string()
        }
    }

    pub fn ranking(&self) -> RankingOptions {
        RankingOptions {
            min_tests: self.city_min_tests,
            top: self.top_cities,
            lowest: self.lowest_cities,
        }
    }
}

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.rows_per_page, 50);
        assert_eq!(config.ranking(), RankingOptions::default());
        assert_eq!(config.default_providers, vec!["DITO", "Globe", "Smart"]);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let path = format!("{}/mno_perf_test_config.json", env::temp_dir().display());
        fs::write(
            &path,
            r#"{ "data_dir": "/srv/mno", "sources": { "cities": "cities.csv" }, "top_cities": 5 }"#,
        )
        .unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.data_dir, "/srv/mno");
        assert_eq!(config.sources.cities, "cities.csv");
        assert_eq!(config.sources.daily, "other_data_daily.csv");
        assert_eq!(config.top_cities, 5);
        assert_eq!(config.city_min_tests, 20);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let path = format!("{}/mno_perf_test_bad_config.json", env::temp_dir().display());
        fs::write(&path, "{ not json").unwrap();

        assert!(DashboardConfig::load(&path).is_err());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_resolve_sources() {
        let config = DashboardConfig {
            data_dir: "data".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.resolve("https://example.org/a.csv"),
            "https://example.org/a.csv"
        );
        assert_eq!(
            config.resolve("a.csv"),
            Path::new("data").join("a.csv").display().to_string()
        );

        let remote = DashboardConfig {
            data_dir: "https://example.org/data/".to_string(),
            ..Default::default()
        };
        assert_eq!(remote.resolve("a.csv"), "https://example.org/data/a.csv");
    }
}
