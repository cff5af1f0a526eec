use crate::prelude::{StatsError, StatsResult};
use serde::{Deserialize, Deserializer, Serialize};

/// Case counts for one region, or the global totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestStats {
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
}

impl LatestStats {
    pub fn new(confirmed: u64, deaths: u64, recovered: u64) -> Self {
        Self {
            confirmed,
            deaths,
            recovered,
        }
    }

    /// Field names and values in the order the API declares them.
    pub fn fields(&self) -> [(&'static str, u64); 3] {
        [
            ("confirmed", self.confirmed),
            ("deaths", self.deaths),
            ("recovered", self.recovered),
        ]
    }
}

/// Aggregate totals across all regions.
pub type GlobalSnapshot = LatestStats;

/// Geographic anchor of a region, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(deserialize_with = "degrees")]
    pub latitude: f64,
    #[serde(deserialize_with = "degrees")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One reporting unit: a country, optionally narrowed to a province.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub country: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub province: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub country_code: String,
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub last_updated: String,
    #[serde(default)]
    pub coordinates: Coordinates,
    pub latest: LatestStats,
}

impl RegionRecord {
    pub fn new(
        country: impl Into<String>,
        province: impl Into<String>,
        coordinates: Coordinates,
        latest: LatestStats,
    ) -> Self {
        Self {
            country: country.into(),
            province: province.into(),
            country_code: String::new(),
            id: 0,
            last_updated: String::new(),
            coordinates,
            latest,
        }
    }
}

/// Full `/locations` response: global totals plus per-region records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub latest: GlobalSnapshot,
    #[serde(default)]
    pub locations: Vec<RegionRecord>,
}

impl FetchResult {
    pub fn new(latest: GlobalSnapshot, locations: Vec<RegionRecord>) -> Self {
        Self { latest, locations }
    }

    pub fn from_json(body: &str) -> StatsResult<Self> {
        serde_json::from_str(body).map_err(|e| StatsError::Decode(e.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

// The public API serves coordinates as strings ("41.87194").
fn degrees<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Degrees::deserialize(deserializer)? {
        Degrees::Number(value) => Ok(value),
        Degrees::Text(text) if text.trim().is_empty() => Ok(0.0),
        Degrees::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid coordinate '{text}': {e}"))),
    }
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
