use covidcore::pins::{ConfigStore, CONFIG_NAMESPACE, PINNED_COUNTRIES_KEY};
use covidcore::{StatsError, StatsResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

type Sections = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Settings file laid out as `covid-stats: { pinned-countries: [...] }`.
///
/// A missing file reads as the defaults (no pinned countries); a file that
/// exists but lacks the key is a configuration error.
pub struct YamlSettingsStore {
    path: PathBuf,
}

impl YamlSettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StatsResult<Sections> {
        if !self.path.exists() {
            let mut defaults = BTreeMap::new();
            defaults.insert(PINNED_COUNTRIES_KEY.to_string(), Vec::new());
            return Ok(Sections::from([(CONFIG_NAMESPACE.to_string(), defaults)]));
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            StatsError::Config(format!("reading settings {}: {e}", self.path.display()))
        })?;
        if contents.trim().is_empty() {
            return Ok(Sections::new());
        }
        serde_yaml::from_str(&contents).map_err(|e| {
            StatsError::Config(format!("parsing settings {}: {e}", self.path.display()))
        })
    }
}

impl ConfigStore for YamlSettingsStore {
    fn read(&self, key: &str) -> StatsResult<Vec<String>> {
        self.load()?
            .get(CONFIG_NAMESPACE)
            .and_then(|section| section.get(key))
            .cloned()
            .ok_or_else(|| {
                StatsError::Config(format!(
                    "no config found for {CONFIG_NAMESPACE}.{key} in {}",
                    self.path.display()
                ))
            })
    }

    fn write(&mut self, key: &str, values: &[String]) -> StatsResult<()> {
        let mut sections = self.load()?;
        sections
            .entry(CONFIG_NAMESPACE.to_string())
            .or_default()
            .insert(key.to_string(), values.to_vec());
        let yaml = serde_yaml::to_string(&sections)
            .map_err(|e| StatsError::Config(format!("encoding settings: {e}")))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StatsError::Config(format!("creating {}: {e}", parent.display()))
            })?;
        }
        fs::write(&self.path, yaml).map_err(|e| {
            StatsError::Config(format!("writing settings {}: {e}", self.path.display()))
        })
    }
}
