use crate::workflow::config::TrackerConfig;
use crate::workflow::settings::YamlSettingsStore;
use covidcore::api::{FetchResult, FileSource, HttpSource};
use covidcore::map::{find_country, markers, MapMarker, MapMessage};
use covidcore::pins::{ConfigStore, PinRegistry, PinSet};
use covidcore::telemetry::Metrics;
use covidcore::view::{RefreshOutcome, StatsProvider};
use covidcore::{Scope, StatsError, StatsResult, StatsSource};
use log::warn;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Where fresh statistics come from.
pub enum Source {
    Http(HttpSource),
    File(FileSource),
}

impl Source {
    pub fn from_config(config: &TrackerConfig, snapshot: Option<PathBuf>) -> StatsResult<Self> {
        match snapshot {
            Some(path) => Ok(Source::File(FileSource::new(path))),
            None => Ok(Source::Http(HttpSource::new(
                config.api_url.clone(),
                config.timeout(),
            )?)),
        }
    }
}

impl StatsSource for Source {
    async fn fetch(&self) -> StatsResult<FetchResult> {
        match self {
            Source::Http(source) => source.fetch().await,
            Source::File(source) => source.fetch().await,
        }
    }
}

pub type SettingsStore = Box<dyn ConfigStore + Send>;

/// Wires the three scoped providers to one source and the pin registry,
/// and implements the user-facing commands on top of them.
pub struct Runner {
    source: Source,
    world: StatsProvider,
    countries: StatsProvider,
    pinned: StatsProvider,
    registry: Mutex<PinRegistry<SettingsStore>>,
}

impl Runner {
    pub fn new(source: Source, store: SettingsStore) -> Self {
        let registry = PinRegistry::open(store);
        let pinned = StatsProvider::pinned(registry.pins().clone());
        Self {
            source,
            world: StatsProvider::new(Scope::World),
            countries: StatsProvider::new(Scope::Countries),
            pinned,
            registry: Mutex::new(registry),
        }
    }

    pub fn from_config(config: &TrackerConfig, snapshot: Option<PathBuf>) -> StatsResult<Self> {
        let source = Source::from_config(config, snapshot)?;
        let store = YamlSettingsStore::new(&config.settings_path);
        Ok(Self::new(source, Box::new(store)))
    }

    pub fn provider(&self, scope: Scope) -> &StatsProvider {
        match scope {
            Scope::World => &self.world,
            Scope::Countries => &self.countries,
            Scope::Pinned => &self.pinned,
        }
    }

    /// refresh-scope: the pinned scope re-reads the stored pins first.
    pub async fn refresh(&self, scope: Scope) -> StatsResult<RefreshOutcome> {
        if scope == Scope::Pinned {
            let pins = self.reload_pins()?;
            self.pinned.set_pins(pins);
        }
        self.provider(scope).refresh(&self.source).await
    }

    /// Refreshes every scope; failures are logged and the first is returned.
    pub async fn refresh_all(&self) -> StatsResult<()> {
        let mut first_error = None;
        for scope in Scope::ALL {
            if let Err(err) = self.refresh(scope).await {
                warn!("refreshing {scope} failed: {err}");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// pin-country. The pinned view follows through a configuration change.
    pub async fn pin(&self, country: &str) -> StatsResult<bool> {
        let changed = self.with_registry(|registry| registry.pin(country))?;
        if changed {
            self.rebuild_pinned().await;
        }
        Ok(changed)
    }

    /// unpin-country; unpinning a country that is not pinned changes nothing.
    pub async fn unpin(&self, country: &str) -> StatsResult<bool> {
        let changed = self.with_registry(|registry| registry.unpin(country))?;
        if changed {
            self.rebuild_pinned().await;
        }
        Ok(changed)
    }

    /// configuration-changed: reload pins and rebuild the pinned tree.
    pub async fn configuration_changed(&self) -> StatsResult<RefreshOutcome> {
        self.refresh(Scope::Pinned).await
    }

    // The pin itself is already persisted; a failed fetch only leaves the
    // pinned tree stale until the next refresh.
    async fn rebuild_pinned(&self) {
        if let Err(err) = self.configuration_changed().await {
            warn!("pinned view not rebuilt: {err}");
        }
    }

    pub fn pins(&self) -> PinSet {
        self.with_registry(|registry| Ok(registry.pins().clone()))
            .unwrap_or_default()
    }

    /// show-map: markers for the most recent data of any scope.
    pub fn markers(&self) -> StatsResult<Vec<MapMarker>> {
        let data = self.latest_data()?;
        Ok(markers(&data))
    }

    /// show-country-on-map: the message the map surface flies to.
    pub fn locate(&self, country: &str) -> StatsResult<MapMessage> {
        let data = self.latest_data()?;
        let record = find_country(&data.locations, country)?;
        Ok(MapMessage::CountryMap(record.clone()))
    }

    pub fn metrics(&self) -> Vec<(Scope, Metrics)> {
        Scope::ALL
            .iter()
            .map(|scope| (*scope, self.provider(*scope).metrics()))
            .collect()
    }

    fn latest_data(&self) -> StatsResult<Arc<FetchResult>> {
        [&self.countries, &self.pinned, &self.world]
            .iter()
            .find_map(|provider| provider.latest())
            .ok_or_else(|| StatsError::NotFound("no statistics loaded yet".into()))
    }

    fn reload_pins(&self) -> StatsResult<PinSet> {
        self.with_registry(|registry| registry.reload().cloned())
    }

    fn with_registry<T>(
        &self,
        f: impl FnOnce(&mut PinRegistry<SettingsStore>) -> StatsResult<T>,
    ) -> StatsResult<T> {
        let mut registry = self
            .registry
            .lock()
            .map_err(|_| StatsError::Config("pin registry lock poisoned".into()))?;
        f(&mut registry)
    }
}
