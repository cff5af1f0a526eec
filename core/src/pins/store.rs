use crate::prelude::{StatsError, StatsResult};
use std::collections::HashMap;

/// Namespace the tracker's settings live under.
pub const CONFIG_NAMESPACE: &str = "covid-stats";
pub const PINNED_COUNTRIES_KEY: &str = "pinned-countries";

/// Persistent key/value storage for string-list settings.
pub trait ConfigStore {
    /// Fails with [`StatsError::Config`] when the key is not present.
    fn read(&self, key: &str) -> StatsResult<Vec<String>>;
    fn write(&mut self, key: &str, values: &[String]) -> StatsResult<()>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for Box<T> {
    fn read(&self, key: &str) -> StatsResult<Vec<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, values: &[String]) -> StatsResult<()> {
        (**self).write(key, values)
    }
}

/// Process-local store, used when no settings file is configured.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with an empty pin list, mirroring a fresh install.
    pub fn with_defaults() -> Self {
        Self::new().with_key(PINNED_COUNTRIES_KEY, Vec::<String>::new())
    }

    pub fn with_key<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values
            .insert(key.to_string(), values.into_iter().map(Into::into).collect());
        self
    }
}

impl ConfigStore for MemoryStore {
    fn read(&self, key: &str) -> StatsResult<Vec<String>> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| StatsError::Config(format!("no config found for {key} key")))
    }

    fn write(&mut self, key: &str, values: &[String]) -> StatsResult<()> {
        self.values.insert(key.to_string(), values.to_vec());
        Ok(())
    }
}
