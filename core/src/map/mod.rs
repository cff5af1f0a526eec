pub mod locate;
pub mod marker;

pub use locate::{find_country, MapEvent, MapMessage, MapView, FLY_TO_ZOOM, INITIAL_VIEW};
pub use marker::{circle_radius, markers, tooltip, ColorTier, MapMarker, MIN_RADIUS, RADIUS_SCALE};
