use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Named half-open speed ranges used for the `Range` columns and the
/// speed-range filter.
///
/// | Speed (Mbps)   | Bucket  |
/// |----------------|---------|
/// | exactly 0      | Unknown |
/// | [0, 1)         | 0-1     |
/// | [1, 5)         | 1-5     |
/// | [5, 10)        | 5-10    |
/// | [10, 30)       | 10-30   |
/// | [30, 70)       | 30-70   |
/// | [70, 100)      | 70-100  |
/// | >= 100         | 100+    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpeedBucket {
    Unknown,
    #[serde(rename = "0-1")]
    UpTo1,
    #[serde(rename = "1-5")]
    From1To5,
    #[serde(rename = "5-10")]
    From5To10,
    #[serde(rename = "10-30")]
    From10To30,
    #[serde(rename = "30-70")]
    From30To70,
    #[serde(rename = "70-100")]
    From70To100,
    #[serde(rename = "100+")]
    From100,
}

impl SpeedBucket {
    pub const ALL: [SpeedBucket; 8] = [
        SpeedBucket::Unknown,
        SpeedBucket::UpTo1,
        SpeedBucket::From1To5,
        SpeedBucket::From5To10,
        SpeedBucket::From10To30,
        SpeedBucket::From30To70,
        SpeedBucket::From70To100,
        SpeedBucket::From100,
    ];

    pub fn classify(speed: f64) -> Self {
        match speed {
            s if s == 0.0 => SpeedBucket::Unknown,
            s if s < 1.0 => SpeedBucket::UpTo1,
            s if s < 5.0 => SpeedBucket::From1To5,
            s if s < 10.0 => SpeedBucket::From5To10,
            s if s < 30.0 => SpeedBucket::From10To30,
            s if s < 70.0 => SpeedBucket::From30To70,
            s if s < 100.0 => SpeedBucket::From70To100,
            _ => SpeedBucket::From100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpeedBucket::Unknown => "Unknown",
            SpeedBucket::UpTo1 => "0-1",
            SpeedBucket::From1To5 => "1-5",
            SpeedBucket::From5To10 => "5-10",
            SpeedBucket::From10To30 => "10-30",
            SpeedBucket::From30To70 => "30-70",
            SpeedBucket::From70To100 => "70-100",
            SpeedBucket::From100 => "100+",
        }
    }

    /// `[min, max)` bounds; `None` means unbounded above.
    ///
    /// `Unknown` is the degenerate range matching exactly zero.
    pub fn bounds(&self) -> (f64, Option<f64>) {
        match self {
            SpeedBucket::Unknown => (0.0, Some(0.0)),
            SpeedBucket::UpTo1 => (0.0, Some(1.0)),
            SpeedBucket::From1To5 => (1.0, Some(5.0)),
            SpeedBucket::From5To10 => (5.0, Some(10.0)),
            SpeedBucket::From10To30 => (10.0, Some(30.0)),
            SpeedBucket::From30To70 => (30.0, Some(70.0)),
            SpeedBucket::From70To100 => (70.0, Some(100.0)),
            SpeedBucket::From100 => (100.0, None),
        }
    }

    pub fn contains(&self, speed: f64) -> bool {
        match self.bounds() {
            (min, Some(max)) if min == max => speed == min,
            (min, Some(max)) => speed >= min && speed < max,
            (min, None) => speed >= min,
        }
    }
}

impl fmt::Display for SpeedBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SpeedBucket {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SpeedBucket::ALL
            .into_iter()
            .find(|b| b.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown speed range '{s}'"))
    }
}

/// Colour band used by the map markers and table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    Excellent,
    Good,
    Average,
    Poor,
}

impl SpeedTier {
    pub fn classify(download: f64) -> Self {
        match download {
            d if d >= 30.0 => SpeedTier::Excellent,
            d if d >= 10.0 => SpeedTier::Good,
            d if d >= 5.0 => SpeedTier::Average,
            _ => SpeedTier::Poor,
        }
    }
}
