use covidcore::map::{MapMarker, MapView};
use covidcore::telemetry::Metrics;
use covidcore::view::{DisplayNode, RefreshOutcome};
use covidcore::Scope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current tree of one scope, as the tree surface renders it.
#[derive(Debug, Clone, Serialize)]
pub struct TreePayload {
    pub scope: Scope,
    pub revision: u64,
    pub nodes: Vec<DisplayNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<RefreshOutcome>,
}

/// Initial map state: the default view plus one marker per region.
#[derive(Debug, Clone, Serialize)]
pub struct MapPayload {
    pub view: MapView,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PinPayload {
    pub country: String,
    pub changed: bool,
    pub pins: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthPayload {
    pub scopes: BTreeMap<String, Metrics>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryRequest {
    pub country: String,
}
