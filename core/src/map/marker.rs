use crate::api::{FetchResult, RegionRecord};
use serde::Serialize;

/// Smallest circle radius in meters, so tiny outbreaks stay visible.
pub const MIN_RADIUS: u64 = 30_000;
pub const RADIUS_SCALE: u64 = 3;

pub fn circle_radius(confirmed: u64) -> u64 {
    confirmed.saturating_mul(RADIUS_SCALE).max(MIN_RADIUS)
}

/// Marker color bands, green to red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    Minimal,
    Low,
    Guarded,
    Elevated,
    Moderate,
    High,
    Severe,
    Critical,
    Extreme,
}

// Inclusive upper bounds; anything above the last one is `Extreme`.
const TIER_BOUNDS: [(u64, ColorTier); 8] = [
    (1_000, ColorTier::Minimal),
    (10_000, ColorTier::Low),
    (20_000, ColorTier::Guarded),
    (50_000, ColorTier::Elevated),
    (80_000, ColorTier::Moderate),
    (100_000, ColorTier::High),
    (500_000, ColorTier::Severe),
    (1_000_000, ColorTier::Critical),
];

impl ColorTier {
    pub fn for_confirmed(confirmed: u64) -> Self {
        TIER_BOUNDS
            .iter()
            .find(|(bound, _)| confirmed <= *bound)
            .map(|(_, tier)| *tier)
            .unwrap_or(ColorTier::Extreme)
    }

    pub fn hex(self) -> &'static str {
        match self {
            ColorTier::Minimal => "#70FF00",
            ColorTier::Low => "#FFD000",
            ColorTier::Guarded => "#FFC000",
            ColorTier::Elevated => "#FFB000",
            ColorTier::Moderate => "#FFA000",
            ColorTier::High => "#FF7000",
            ColorTier::Severe => "#FF5000",
            ColorTier::Critical => "#FF1000",
            ColorTier::Extreme => "#FF0000",
        }
    }
}

/// HTML tooltip shown when hovering a marker.
pub fn tooltip(record: &RegionRecord) -> String {
    let latest = &record.latest;
    format!(
        "<b>{}, {}</b><br />Confirmed: {}<br />Recovered: {}<br />Deaths: {}",
        record.country, record.province, latest.confirmed, latest.recovered, latest.deaths
    )
}

/// Everything the map surface needs to draw one region's circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub country: String,
    pub province: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: u64,
    pub tier: ColorTier,
    pub color: &'static str,
    pub tooltip: String,
}

impl MapMarker {
    pub fn from_record(record: &RegionRecord) -> Self {
        let confirmed = record.latest.confirmed;
        let tier = ColorTier::for_confirmed(confirmed);
        Self {
            country: record.country.clone(),
            province: record.province.clone(),
            latitude: record.coordinates.latitude,
            longitude: record.coordinates.longitude,
            radius: circle_radius(confirmed),
            tier,
            color: tier.hex(),
            tooltip: tooltip(record),
        }
    }
}

/// One marker per record, in response order.
pub fn markers(data: &FetchResult) -> Vec<MapMarker> {
    data.locations.iter().map(MapMarker::from_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Coordinates, LatestStats};

    #[test]
    fn radius_has_floor_and_no_cap() {
        assert_eq!(circle_radius(0), 30_000);
        assert_eq!(circle_radius(10_000), 30_000);
        assert_eq!(circle_radius(20_000), 60_000);
        assert_eq!(circle_radius(9_999_999), 29_999_997);
        assert_eq!(circle_radius(u64::MAX), u64::MAX);
    }

    #[test]
    fn tier_bounds_are_inclusive() {
        assert_eq!(ColorTier::for_confirmed(0), ColorTier::Minimal);
        assert_eq!(ColorTier::for_confirmed(1_000), ColorTier::Minimal);
        assert_eq!(ColorTier::for_confirmed(1_001), ColorTier::Low);
        assert_eq!(ColorTier::for_confirmed(100_000), ColorTier::High);
        assert_eq!(ColorTier::for_confirmed(1_000_000), ColorTier::Critical);
        assert_eq!(ColorTier::for_confirmed(1_000_001), ColorTier::Extreme);
    }

    #[test]
    fn tiers_are_monotonic() {
        let samples = [0, 999, 1_000, 5_000, 15_000, 40_000, 79_999, 90_000, 400_000, 2_000_000];
        let tiers: Vec<_> = samples.iter().map(|c| ColorTier::for_confirmed(*c)).collect();
        assert!(tiers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn marker_carries_tooltip_and_color() {
        let record = RegionRecord::new(
            "Italy",
            "Lombardy",
            Coordinates::new(45.47, 9.19),
            LatestStats::new(25_000, 3_000, 4_000),
        );
        let marker = MapMarker::from_record(&record);
        assert_eq!(marker.radius, 75_000);
        assert_eq!(marker.color, "#FFB000");
        assert_eq!(
            marker.tooltip,
            "<b>Italy, Lombardy</b><br />Confirmed: 25000<br />Recovered: 4000<br />Deaths: 3000"
        );
    }
}
