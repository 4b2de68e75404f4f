use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mobile network operators recognized by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Provider {
    Smart,
    Globe,
    #[serde(rename = "DITO")]
    Dito,
    #[serde(rename = "TNT")]
    Tnt,
    #[serde(rename = "TM")]
    Tm,
    Sun,
    #[serde(rename = "GOMO")]
    Gomo,
}

/// Upper-cased aliases tested by substring containment, first match wins.
///
/// Order matters: "SMART" must be tried before "TM" so that
/// "SMART COMMUNICATIONS" never resolves to TM.
static ALIASES: &[(&str, Provider)] = &[
    ("SMART", Provider::Smart),
    ("SMART COMMUNICATIONS", Provider::Smart),
    ("GLOBE", Provider::Globe),
    ("GLOBE TELECOM", Provider::Globe),
    ("DITO", Provider::Dito),
    ("DITO TELECOMMUNITY", Provider::Dito),
    ("DITO TELECOM", Provider::Dito),
    ("TNT", Provider::Tnt),
    ("TALK N TEXT", Provider::Tnt),
    ("TALK'N TEXT", Provider::Tnt),
    ("TM", Provider::Tm),
    ("TOUCH MOBILE", Provider::Tm),
    ("SUN", Provider::Sun),
    ("SUN CELLULAR", Provider::Sun),
    ("GOMO", Provider::Gomo),
];

impl Provider {
    pub const ALL: [Provider; 7] = [
        Provider::Smart,
        Provider::Globe,
        Provider::Dito,
        Provider::Tnt,
        Provider::Tm,
        Provider::Sun,
        Provider::Gomo,
    ];

    /// Resolves a free-form carrier label to a canonical provider.
    pub fn resolve(raw: &str) -> Option<Provider> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return None;
        }

        ALIASES
            .iter()
            .find(|(alias, _)| normalized.contains(alias))
            .map(|(_, provider)| *provider)
    }

    /// Display name, also used as the filter key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Smart => "Smart",
            Provider::Globe => "Globe",
            Provider::Dito => "DITO",
            Provider::Tnt => "TNT",
            Provider::Tm => "TM",
            Provider::Sun => "Sun",
            Provider::Gomo => "GOMO",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::resolve(s).ok_or_else(|| anyhow::anyhow!("Unknown provider '{s}'"))
    }
}
