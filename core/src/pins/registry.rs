use crate::pins::set::PinSet;
use crate::pins::store::{ConfigStore, PINNED_COUNTRIES_KEY};
use crate::prelude::StatsResult;
use crate::telemetry::LogManager;

/// Owns the pinned-country list and writes every change straight back to
/// the backing [`ConfigStore`].
///
/// Mutations start from the stored list rather than the in-memory copy, so
/// edits made to the settings behind our back are not overwritten.
pub struct PinRegistry<S: ConfigStore> {
    store: S,
    pins: PinSet,
    logger: LogManager,
}

impl<S: ConfigStore> PinRegistry<S> {
    /// Loads the current pins. A missing key starts the registry empty.
    pub fn open(store: S) -> Self {
        let logger = LogManager::new("pins");
        let pins = match store.read(PINNED_COUNTRIES_KEY) {
            Ok(names) => PinSet::from_names(names),
            Err(err) => {
                logger.warn(&format!("starting with no pinned countries: {err}"));
                PinSet::new()
            }
        };
        Self {
            store,
            pins,
            logger,
        }
    }

    pub fn pins(&self) -> &PinSet {
        &self.pins
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Pins `country`. Returns `false` when it was already pinned.
    pub fn pin(&mut self, country: &str) -> StatsResult<bool> {
        let mut current = self.read_stored()?;
        if !current.insert(country) {
            self.logger
                .detail(&format!("{} already pinned", country.to_lowercase()));
            self.pins = current;
            return Ok(false);
        }
        self.store.write(PINNED_COUNTRIES_KEY, current.as_slice())?;
        self.logger.record(&format!("pinned {}", country.to_lowercase()));
        self.pins = current;
        Ok(true)
    }

    /// Unpins `country`. Removing a country that is not pinned is a no-op
    /// and returns `false`.
    pub fn unpin(&mut self, country: &str) -> StatsResult<bool> {
        let mut current = self.read_stored()?;
        if !current.remove(country) {
            self.logger
                .detail(&format!("{} is not pinned", country.to_lowercase()));
            self.pins = current;
            return Ok(false);
        }
        self.store.write(PINNED_COUNTRIES_KEY, current.as_slice())?;
        self.logger
            .record(&format!("unpinned {}", country.to_lowercase()));
        self.pins = current;
        Ok(true)
    }

    /// Replaces the in-memory set with the stored one.
    pub fn reload(&mut self) -> StatsResult<&PinSet> {
        self.pins = self.read_stored()?;
        self.logger
            .detail(&format!("reloaded {} pinned countries", self.pins.len()));
        Ok(&self.pins)
    }

    fn read_stored(&self) -> StatsResult<PinSet> {
        Ok(PinSet::from_names(self.store.read(PINNED_COUNTRIES_KEY)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::store::MemoryStore;
    use crate::prelude::StatsError;

    #[test]
    fn pin_then_reload_round_trips() {
        let mut registry = PinRegistry::open(MemoryStore::with_defaults());
        assert!(registry.pin("France").unwrap());
        let pins = registry.reload().unwrap();
        assert!(pins.contains("france"));
        assert_eq!(
            registry.store().read(PINNED_COUNTRIES_KEY).unwrap(),
            vec!["france"]
        );

        assert!(registry.unpin("france").unwrap());
        assert!(registry.reload().unwrap().is_empty());
    }

    #[test]
    fn repinning_is_a_no_op() {
        let mut registry = PinRegistry::open(MemoryStore::with_defaults());
        registry.pin("Italy").unwrap();
        assert!(!registry.pin("ITALY").unwrap());
        assert_eq!(registry.pins().len(), 1);
    }

    #[test]
    fn unpin_absent_keeps_other_pins() {
        let store = MemoryStore::new().with_key(PINNED_COUNTRIES_KEY, ["italy", "spain"]);
        let mut registry = PinRegistry::open(store);
        assert!(!registry.unpin("Germany").unwrap());
        assert_eq!(
            registry.store().read(PINNED_COUNTRIES_KEY).unwrap(),
            vec!["italy", "spain"]
        );
    }

    #[test]
    fn missing_key_fails_mutation_but_not_open() {
        let mut registry = PinRegistry::open(MemoryStore::new());
        assert!(registry.pins().is_empty());
        assert!(matches!(registry.pin("Italy"), Err(StatsError::Config(_))));
        assert!(matches!(registry.reload(), Err(StatsError::Config(_))));
        assert!(registry.pins().is_empty());
    }

    #[test]
    fn mutations_start_from_stored_list() {
        let mut registry = PinRegistry::open(MemoryStore::with_defaults());
        registry.pin("Italy").unwrap();
        // Simulates an edit to the settings made outside the registry.
        let mut edited = registry.store().clone();
        edited
            .write(PINNED_COUNTRIES_KEY, &["italy".into(), "japan".into()])
            .unwrap();
        let mut registry = PinRegistry {
            store: edited,
            pins: registry.pins().clone(),
            logger: LogManager::new("pins"),
        };
        registry.pin("Spain").unwrap();
        assert_eq!(
            registry.pins().iter().collect::<Vec<_>>(),
            vec!["italy", "japan", "spain"]
        );
    }
}
