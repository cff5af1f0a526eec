use crate::api::FetchResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;

/// Which subset and shape of the data a provider renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    World,
    Countries,
    Pinned,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::World, Scope::Countries, Scope::Pinned];

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::World => "world",
            Scope::Countries => "countries",
            Scope::Pinned => "pinned",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "world" | "worldwide" => Ok(Scope::World),
            "countries" => Ok(Scope::Countries),
            "pinned" => Ok(Scope::Pinned),
            other => Err(StatsError::NotFound(format!("unknown scope '{other}'"))),
        }
    }
}

/// Common error type for fetching, lookups and pin persistence.
#[derive(thiserror::Error, Debug)]
pub enum StatsError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("decode failure: {0}")]
    Decode(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type StatsResult<T> = Result<T, StatsError>;

/// Anything that can produce a fresh [`FetchResult`].
///
/// Every call hits the source again; results are never cached.
pub trait StatsSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = StatsResult<FetchResult>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parses_case_insensitively() {
        assert_eq!("WORLD".parse::<Scope>().unwrap(), Scope::World);
        assert_eq!(" Pinned ".parse::<Scope>().unwrap(), Scope::Pinned);
        assert!(matches!(
            "provinces".parse::<Scope>(),
            Err(StatsError::NotFound(_))
        ));
    }

    #[test]
    fn scope_display_matches_parse() {
        for scope in Scope::ALL {
            assert_eq!(scope.to_string().parse::<Scope>().unwrap(), scope);
        }
    }
}
