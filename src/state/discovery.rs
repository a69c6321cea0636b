//! The shared discovery map
//!
//! Every URL found during one crawl lands here exactly once. Both the sitemap
//! resolver and the HTML crawler write through `insert_if_absent`, which is
//! what makes the first recorded source permanent.

use crate::state::{Source, UrlEntry};
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Ordered, deduplicated map from canonical URL to its entry
///
/// Iteration follows discovery order.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryMap {
    entries: IndexMap<String, UrlEntry>,
}

impl DiscoveryMap {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `url` with `source` unless the URL is already present
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and has been recorded
    /// * `false` - The URL was already present; its source is unchanged
    pub fn insert_if_absent(&mut self, url: &str, source: &Source) -> bool {
        match self.entries.entry(url.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(UrlEntry {
                    url: url.to_string(),
                    source: source.to_string(),
                });
                true
            }
        }
    }

    /// Looks up the entry for a canonical URL
    pub fn get(&self, url: &str) -> Option<&UrlEntry> {
        self.entries.get(url)
    }

    /// Number of discovered URLs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been discovered yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the current keys in discovery order
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Consumes the map, returning its entries in discovery order
    pub fn into_entries(self) -> Vec<UrlEntry> {
        self.entries.into_values().collect()
    }
}
