//! In-memory model of a whole service file.
//!
//! Invariants:
//! - Section names are unique (case-sensitive exact match).
//! - Order mirrors the file: new names are appended, removed names close the gap.
//! - Replacing an existing name keeps its position.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Section;

/// Ordered mapping of service name to its `Section`.
///
/// An empty `ServiceConfig` is valid and stands for an existing but empty file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceConfig(IndexMap<String, Section>);

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service names in file order.
    pub fn names(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    /// Service names ordered case-insensitively; ties keep file order.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names = self.names();
        names.sort_by_cached_key(|name| name.to_lowercase());
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.0.get_mut(name)
    }

    /// Stores `section` under `name`, returning the section it replaced.
    pub fn insert(&mut self, name: impl Into<String>, section: Section) -> Option<Section> {
        self.0.insert(name.into(), section)
    }

    pub fn remove(&mut self, name: &str) -> Option<Section> {
        self.0.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.0.iter().map(|(name, section)| (name.as_str(), section))
    }
}

/// Canonical file text, exactly what the store writes to disk.
impl fmt::Display for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, section) in self.iter() {
            crate::persistence::format::write_section(f, name, section)?;
        }
        Ok(())
    }
}
