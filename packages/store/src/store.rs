//! The resource store facade: configuration, bulk load, point lookup.

use crate::backend::Backend;
use crate::config::{LoadMode, StoreConfig};
use crate::error::Error;
use crate::loader::{self, LoadResult};
use crate::memory::MemoryBackend;
use crate::remote::RemoteBackend;

/// A store of localized text, bulk-loaded from language-pack files and
/// queried by `(language tag, id)`.
///
/// The store starts unloaded: every query comes back empty until [`load`]
/// completes. Records live in whichever backend the configuration selects;
/// switching backends with [`set_mode`] discards the old one and requires a
/// fresh load.
///
/// [`load`]: Self::load
/// [`set_mode`]: Self::set_mode
///
/// # Example
///
/// ```ignore
/// use langpack_store::{LangStore, StoreConfig};
///
/// let mut store = LangStore::new(StoreConfig::default().with_directory("lang"));
/// for result in store.load()? {
///     println!("{}: {}/{}", result.tag, result.reality, result.estimate);
/// }
/// assert_eq!(store.query("en", 1), "Hello");
/// ```
pub struct LangStore {
    config: StoreConfig,
    backend: Box<dyn Backend>,
    loaded: bool,
}

impl LangStore {
    /// Build a store from `config`. Empty configuration fields fall back to
    /// the defaults and the suffix is lowercased for case-insensitive
    /// matching.
    pub fn new(config: StoreConfig) -> Self {
        let config = config.normalized();
        let backend = backend_for(&config);
        Self {
            config,
            backend,
            loaded: false,
        }
    }

    /// Build a store over an explicit backend, bypassing mode selection.
    pub fn with_backend(config: StoreConfig, backend: Box<dyn Backend>) -> Self {
        Self {
            config: config.normalized(),
            backend,
            loaded: false,
        }
    }

    /// The effective configuration, after defaulting and normalization.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether a bulk load has completed since construction or the last
    /// mode switch.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Switch the storage strategy. The current backend is discarded and
    /// the loaded flag cleared, unconditionally, even for the mode already
    /// active; nothing is served again until [`load`](Self::load) runs.
    pub fn set_mode(&mut self, mode: LoadMode) {
        self.config.mode = mode;
        self.backend = backend_for(&self.config);
        self.loaded = false;
    }

    /// Scan the configured directory and load every language-pack file into
    /// the active backend.
    ///
    /// Returns one [`LoadResult`] per tagged file. Fails only when the
    /// directory itself cannot be read, in which case the backend is left
    /// untouched. Unreadable and untagged files are skipped, malformed
    /// lines are dropped per the format rules, and backend write failures
    /// depress `reality`; none of those abort the load, and the store
    /// counts as loaded afterward regardless.
    pub fn load(&mut self) -> Result<Vec<LoadResult>, Error> {
        let results = loader::load_directory(
            &self.config.directory,
            &self.config.suffix,
            &self.config.separator,
            self.backend.as_mut(),
        )?;
        self.loaded = true;
        Ok(results)
    }

    /// Fetch the text under `(tag, id)`, distinguishing a miss from a
    /// backend failure.
    ///
    /// Returns `Ok(None)` without touching the backend until a load has
    /// completed.
    pub fn lookup(&self, tag: &str, id: i64) -> Result<Option<String>, Error> {
        if !self.loaded {
            return Ok(None);
        }
        self.backend.lookup(tag, id)
    }

    /// Fetch the text under `(tag, id)`, or an empty string when the record
    /// is missing, the store is not loaded, or the backend fails.
    ///
    /// Failures are logged and collapse to the empty string; callers that
    /// need to tell an error from a miss use [`lookup`](Self::lookup).
    pub fn query(&self, tag: &str, id: i64) -> String {
        match self.lookup(tag, id) {
            Ok(Some(text)) => text,
            Ok(None) => String::new(),
            Err(error) => {
                log::warn!("lookup failed for {tag}/{id}: {error}");
                String::new()
            }
        }
    }
}

impl Default for LangStore {
    /// An unloaded store over the default configuration: current directory,
    /// `.lps` files, `~` separator, in-memory records.
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

fn backend_for(config: &StoreConfig) -> Box<dyn Backend> {
    match config.mode {
        LoadMode::Memory => Box::new(MemoryBackend::new()),
        LoadMode::Remote => Box::new(RemoteBackend::new(&config.remote)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::{Arc, Mutex};

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn construction_normalizes_config() {
        let store = LangStore::new(
            StoreConfig::default()
                .with_directory("")
                .with_suffix(".LPS")
                .with_separator(""),
        );
        assert_eq!(store.config().directory, std::path::PathBuf::from("."));
        assert_eq!(store.config().suffix, ".lps");
        assert_eq!(store.config().separator, "~");
    }

    #[test]
    fn unloaded_store_serves_nothing() {
        let store = LangStore::default();
        assert!(!store.is_loaded());
        assert_eq!(store.query("en", 1), "");
        assert_eq!(store.lookup("en", 1).unwrap(), None);
    }

    #[test]
    fn set_mode_clears_loaded_even_for_the_same_mode() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.lps"), "en\n1~Hello\n").unwrap();

        let mut store = LangStore::new(StoreConfig::default().with_directory(dir.path()));
        store.load().unwrap();
        assert!(store.is_loaded());
        assert_eq!(store.query("en", 1), "Hello");

        store.set_mode(LoadMode::Memory);
        assert!(!store.is_loaded());
        assert_eq!(store.query("en", 1), "");

        store.load().unwrap();
        assert_eq!(store.query("en", 1), "Hello");
    }

    // Records every commit so the loader's traffic can be asserted.
    struct RecordingBackend {
        commits: Arc<Mutex<Vec<(String, i64, String)>>>,
    }

    impl Backend for RecordingBackend {
        fn reset(&mut self) -> Result<(), Error> {
            self.commits.lock().unwrap().clear();
            Ok(())
        }

        fn begin_pack(&mut self, _tag: &str) -> Result<(), Error> {
            Ok(())
        }

        fn commit(&mut self, tag: &str, id: i64, text: &str) -> Result<(), Error> {
            self.commits
                .lock()
                .unwrap()
                .push((tag.to_string(), id, text.to_string()));
            Ok(())
        }

        fn lookup(&self, _tag: &str, _id: i64) -> Result<Option<String>, Error> {
            Ok(None)
        }
    }

    #[test]
    fn with_backend_routes_commits_through_the_injected_backend() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.lps"), "en\n1~Hello\n2~World\n").unwrap();

        let commits = Arc::new(Mutex::new(Vec::new()));
        let backend = RecordingBackend {
            commits: Arc::clone(&commits),
        };
        let mut store = LangStore::with_backend(
            StoreConfig::default().with_directory(dir.path()),
            Box::new(backend),
        );

        let results = store.load().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].reality, 2);
        assert_eq!(
            *commits.lock().unwrap(),
            vec![
                ("en".to_string(), 1, "Hello".to_string()),
                ("en".to_string(), 2, "World".to_string()),
            ]
        );
    }
}
