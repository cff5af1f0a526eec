use crate::api::FetchResult;
use crate::prelude::{StatsError, StatsResult, StatsSource};
use log::debug;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://coronavirus-tracker-api.herokuapp.com/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches `<base>/locations` from the statistics API.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> StatsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StatsError::Network(format!("building http client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn locations_url(&self) -> String {
        format!("{}/locations", self.base_url)
    }
}

impl StatsSource for HttpSource {
    async fn fetch(&self) -> StatsResult<FetchResult> {
        let url = self.locations_url();
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StatsError::Network(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::Network(format!("GET {url} returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StatsError::Network(format!("reading body of {url}: {e}")))?;
        FetchResult::from_json(&body)
    }
}

/// Reads a saved `/locations` payload from disk instead of the network.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsSource for FileSource {
    async fn fetch(&self) -> StatsResult<FetchResult> {
        debug!("reading snapshot {}", self.path.display());
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            StatsError::Network(format!("reading snapshot {}: {e}", self.path.display()))
        })?;
        FetchResult::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn locations_url_ignores_trailing_slash() {
        let source = HttpSource::new("http://localhost:8000/v2/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(source.locations_url(), "http://localhost:8000/v2/locations");
    }

    #[tokio::test]
    async fn file_source_reads_snapshot() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            br#"{"latest": {"confirmed": 5, "deaths": 1, "recovered": 2}, "locations": []}"#,
        )
        .unwrap();
        let source = FileSource::new(temp.path());
        let result = source.fetch().await.unwrap();
        assert_eq!(result.latest.confirmed, 5);
        assert!(result.locations.is_empty());
    }

    #[tokio::test]
    async fn missing_snapshot_is_unreachable_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.json"));
        assert!(matches!(
            source.fetch().await,
            Err(StatsError::Network(_))
        ));
    }

    #[tokio::test]
    async fn file_source_reports_malformed_snapshot() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"<html>503</html>").unwrap();
        let source = FileSource::new(temp.path());
        assert!(matches!(source.fetch().await, Err(StatsError::Decode(_))));
    }
}
