//! Remote storage for loaded language packs, backed by pooled Redis
//! connections.

use langpack_redis_kv::{PoolSettings, Registry};

use crate::backend::Backend;
use crate::config::RemoteSettings;
use crate::error::Error;

/// Logical tag the backend registers its pool under. One backend, one pool.
const POOL_TAG: &str = "langpack";

/// Stores records as flat string keys, `lang::<tag>::<id>`.
///
/// `reset` re-registers the connection pool but deliberately leaves remote
/// keys in place: a re-load overwrites records key by key, and keys absent
/// from the new files simply go stale. Registration never dials; the first
/// commit or lookup does.
pub struct RemoteBackend {
    registry: Registry,
    settings: PoolSettings,
}

impl RemoteBackend {
    /// Build from store-level connection details, with default pool limits.
    /// An empty credential means no authentication.
    pub fn new(remote: &RemoteSettings) -> Self {
        let mut settings =
            PoolSettings::new(remote.endpoint.clone()).with_database(remote.database);
        if let Some(credential) = remote.credential.as_deref().filter(|c| !c.is_empty()) {
            settings = settings.with_credential(credential);
        }
        Self::with_pool(settings)
    }

    /// Build with explicit pool limits and timeouts.
    pub fn with_pool(settings: PoolSettings) -> Self {
        Self {
            registry: Registry::new(),
            settings,
        }
    }

    fn key(tag: &str, id: i64) -> String {
        format!("lang::{tag}::{id}")
    }
}

impl Backend for RemoteBackend {
    fn reset(&mut self) -> Result<(), Error> {
        self.registry.destroy_all();
        self.registry.register(POOL_TAG, self.settings.clone());
        Ok(())
    }

    fn begin_pack(&mut self, _tag: &str) -> Result<(), Error> {
        // Records are overwritten key by key; nothing to prepare.
        Ok(())
    }

    fn commit(&mut self, tag: &str, id: i64, text: &str) -> Result<(), Error> {
        self.registry.set(POOL_TAG, &Self::key(tag, id), text)?;
        Ok(())
    }

    fn lookup(&self, tag: &str, id: i64) -> Result<Option<String>, Error> {
        Ok(self.registry.get(POOL_TAG, &Self::key(tag, id))?)
    }
}
