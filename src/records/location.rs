use serde::Serialize;

/// A `"Barangay, City, Province"` string split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub barangay: String,
    pub city: String,
    pub province: String,
}

impl Location {
    /// Splits on commas and trims each segment. Missing segments stay empty,
    /// extra segments are ignored, and `"-"` means "no location".
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "-" {
            return Self::default();
        }

        let mut parts = raw.split(',').map(|s| s.trim().to_string());

        Self {
            barangay: parts.next().unwrap_or_default(),
            city: parts.next().unwrap_or_default(),
            province: parts.next().unwrap_or_default(),
        }
    }

    /// Replaces the province with `capital` when it carries a value.
    pub fn with_province_override(mut self, capital: Option<&str>) -> Self {
        if let Some(capital) = capital.map(str::trim).filter(|c| !c.is_empty()) {
            self.province = capital.to_string();
        }
        self
    }
}

/// Splits an aggregate `"City, Province, Country"` name into `(city, province)`.
///
/// Returns `None` when fewer than two segments are present.
pub fn split_location_name(name: &str) -> Option<(&str, &str)> {
    let mut parts = name.split(',');
    let city = parts.next()?.trim();
    let province = parts.next()?.trim();
    Some((city, province))
}

/// City part of an aggregate location name (text before the first comma).
pub fn city_of(name: &str) -> &str {
    name.split(',').next().unwrap_or_default().trim()
}
