use anyhow::Context;
use covidcore::api::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pin settings file used when none is configured.
pub const DEFAULT_SETTINGS_FILE: &str = "covid-stats.yaml";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    /// YAML file holding the pinned countries. Relative paths in a loaded
    /// config resolve against the config file's directory.
    pub settings_path: PathBuf,
    pub bind: SocketAddr,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            settings_path: PathBuf::from(DEFAULT_SETTINGS_FILE),
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
        }
    }
}

impl TrackerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading tracker config {}", path_ref.display()))?;
        let mut config: TrackerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing tracker config {}", path_ref.display()))?;
        if config.settings_path.is_relative() {
            if let Some(dir) = path_ref.parent() {
                config.settings_path = dir.join(&config.settings_path);
            }
        }
        Ok(config)
    }

    /// Command-line values win over whatever the file or defaults say.
    pub fn with_overrides(
        mut self,
        api_url: Option<String>,
        settings_path: Option<PathBuf>,
        bind: Option<SocketAddr>,
    ) -> Self {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        if let Some(settings_path) = settings_path {
            self.settings_path = settings_path;
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_point_at_public_api() {
        let cfg = TrackerConfig::default();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.settings_path, PathBuf::from(DEFAULT_SETTINGS_FILE));
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"api_url: http://localhost:8000/v2\ntimeout_secs: 3\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = TrackerConfig::load(&path).unwrap();
        assert_eq!(cfg.api_url, "http://localhost:8000/v2");
        assert_eq!(cfg.timeout_secs, 3);
        assert_eq!(
            cfg.settings_path,
            path.parent().unwrap().join(DEFAULT_SETTINGS_FILE)
        );
    }

    #[test]
    fn overrides_replace_loaded_values() {
        let cfg = TrackerConfig::default().with_overrides(
            Some("http://mirror/v2".into()),
            Some(PathBuf::from("pins.yaml")),
            None,
        );
        assert_eq!(cfg.api_url, "http://mirror/v2");
        assert_eq!(cfg.settings_path, PathBuf::from("pins.yaml"));
        assert_eq!(cfg.bind.port(), 9000);
    }

    #[test]
    fn absolute_settings_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let pins = dir.path().join("pins.yaml");
        let config_path = dir.path().join("tracker.yaml");
        fs::write(&config_path, format!("settings_path: {}\n", pins.display())).unwrap();
        let cfg = TrackerConfig::load(&config_path).unwrap();
        assert_eq!(cfg.settings_path, pins);
    }
}
