//! Core data shaping for the epidemic statistics tracker.
//!
//! Turns the flat `/locations` payload of the statistics API into the
//! hierarchical view model consumed by the tree surfaces, keeps the pinned
//! country registry, and derives marker geometry for the map surface.

pub mod api;
pub mod map;
pub mod pins;
pub mod prelude;
pub mod telemetry;
pub mod view;

pub use prelude::{Scope, StatsError, StatsResult, StatsSource};
