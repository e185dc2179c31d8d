//! In-process storage for loaded language packs.

use std::collections::HashMap;

use crate::backend::Backend;
use crate::error::Error;

/// Keeps every record in a nested map, keyed by tag and then id.
///
/// `begin_pack` starts a tag over with an empty table, so a re-load (or a
/// second file carrying the same tag) replaces that tag's records wholesale
/// rather than merging into them.
pub struct MemoryBackend {
    langs: HashMap<String, HashMap<i64, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            langs: HashMap::new(),
        }
    }

    /// Number of language tags currently held.
    pub fn tag_count(&self) -> usize {
        self.langs.len()
    }

    /// Number of records held under `tag`.
    pub fn record_count(&self, tag: &str) -> usize {
        self.langs.get(tag).map(HashMap::len).unwrap_or(0)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for MemoryBackend {
    fn reset(&mut self) -> Result<(), Error> {
        self.langs.clear();
        Ok(())
    }

    fn begin_pack(&mut self, tag: &str) -> Result<(), Error> {
        self.langs.insert(tag.to_string(), HashMap::new());
        Ok(())
    }

    fn commit(&mut self, tag: &str, id: i64, text: &str) -> Result<(), Error> {
        self.langs
            .entry(tag.to_string())
            .or_default()
            .insert(id, text.to_string());
        Ok(())
    }

    fn lookup(&self, tag: &str, id: i64) -> Result<Option<String>, Error> {
        Ok(self
            .langs
            .get(tag)
            .and_then(|records| records.get(&id))
            .cloned())
    }
}
