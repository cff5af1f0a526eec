use serde::{Deserialize, Serialize};

/// Lower-cased country names marked by the user, in pin order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinSet {
    names: Vec<String>,
}

impl PinSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes and de-duplicates names, keeping the first occurrence.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for name in names {
            set.insert(name.as_ref());
        }
        set
    }

    pub fn contains(&self, country: &str) -> bool {
        let key = country.to_lowercase();
        self.names.iter().any(|name| *name == key)
    }

    /// Appends the lower-cased name; returns `false` if it was already pinned.
    pub fn insert(&mut self, country: &str) -> bool {
        if self.contains(country) {
            return false;
        }
        self.names.push(country.to_lowercase());
        true
    }

    /// Removes the first matching entry; returns `false` if none matched.
    pub fn remove(&mut self, country: &str) -> bool {
        let key = country.to_lowercase();
        match self.names.iter().position(|name| *name == key) {
            Some(index) => {
                self.names.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}
