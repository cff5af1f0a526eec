pub mod registry;
pub mod set;
pub mod store;

pub use registry::PinRegistry;
pub use set::PinSet;
pub use store::{ConfigStore, MemoryStore, CONFIG_NAMESPACE, PINNED_COUNTRIES_KEY};
