pub mod fetch;
pub mod region;

pub use fetch::{FileSource, HttpSource, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use region::{Coordinates, FetchResult, GlobalSnapshot, LatestStats, RegionRecord};
