//! Sorted version → value table for a single function base name.

use super::resolve::{first_available, resolve};
use super::VersionKey;

/// Ascending version table. Keys are unique; inserting an existing key
/// replaces its value.
#[derive(Debug, Clone)]
pub struct VersionTable<T> {
    keys: Vec<VersionKey>,
    values: Vec<T>,
}

impl<T> VersionTable<T> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Insert a value; returns the previous value for the same key.
    pub fn insert(&mut self, version: VersionKey, value: T) -> Option<T> {
        match self.keys.binary_search(&version) {
            Ok(idx) => Some(std::mem::replace(&mut self.values[idx], value)),
            Err(idx) => {
                self.keys.insert(idx, version);
                self.values.insert(idx, value);
                None
            }
        }
    }

    /// Entry in effect as of `requested`.
    pub fn resolve(&self, requested: &VersionKey) -> Option<(VersionKey, &T)> {
        let version = resolve(&self.keys, requested)?;
        self.get(&version).map(|v| (version, v))
    }

    pub fn get(&self, version: &VersionKey) -> Option<&T> {
        self.keys
            .binary_search(version)
            .ok()
            .map(|idx| &self.values[idx])
    }

    pub fn first_version(&self) -> Option<VersionKey> {
        first_available(&self.keys)
    }

    pub fn versions(&self) -> &[VersionKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<T> Default for VersionTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
