use crate::api::RegionRecord;
use crate::prelude::{StatsError, StatsResult};
use serde::{Deserialize, Serialize};

pub const FLY_TO_ZOOM: u8 = 5;

/// Where the map is centered and how far it is zoomed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

impl MapView {
    /// Centered on the record's coordinates at fly-to zoom.
    pub fn fly_to(record: &RegionRecord) -> Self {
        Self {
            latitude: record.coordinates.latitude,
            longitude: record.coordinates.longitude,
            zoom: FLY_TO_ZOOM,
        }
    }
}

pub const INITIAL_VIEW: MapView = MapView {
    latitude: 35.0,
    longitude: 0.0,
    zoom: 3,
};

/// First record whose country name matches exactly.
pub fn find_country<'a>(records: &'a [RegionRecord], country: &str) -> StatsResult<&'a RegionRecord> {
    records
        .iter()
        .find(|record| record.country == country)
        .ok_or_else(|| {
            StatsError::NotFound(format!("provided country ({country}) is not valid"))
        })
}

/// Sent from the tree side to the map surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "payload")]
pub enum MapMessage {
    #[serde(rename = "COUNTRY_MAP")]
    CountryMap(RegionRecord),
}

impl MapMessage {
    /// View the map should fly to after handling this message.
    pub fn target(&self) -> MapView {
        match self {
            MapMessage::CountryMap(record) => MapView::fly_to(record),
        }
    }
}

/// Sent from the map surface back to the tree side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum MapEvent {
    /// A message to show the user as an error alert.
    Alert { text: String },
    /// A marker was clicked; carries the country label.
    ShowOnMap { label: String },
}
