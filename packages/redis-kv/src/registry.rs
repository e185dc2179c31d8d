//! Named connection pools and the one-shot command helpers built on them.

use std::collections::HashMap;

use r2d2::Pool;

use crate::error::Error;
use crate::manager::{ConnectionManager, PoolSettings};

/// A connection borrowed from a registered pool. Returned to the pool when
/// dropped, on every exit path.
pub type PooledConnection = r2d2::PooledConnection<ConnectionManager>;

/// Owns Redis connection pools keyed by a logical tag.
///
/// Pools are built without dialing; the first borrow dials, and dial failures
/// surface at whichever operation triggered them. Each command helper borrows
/// one connection, issues exactly one command, and releases the connection
/// before returning.
///
/// # Example
///
/// ```ignore
/// use langpack_redis_kv::{PoolSettings, Registry};
///
/// let mut registry = Registry::new();
/// registry.register("cache", PoolSettings::new("127.0.0.1:6379"));
/// registry.set("cache", "greeting", "hello")?;
/// assert_eq!(registry.get("cache", "greeting")?, Some("hello".to_string()));
/// ```
pub struct Registry {
    pools: HashMap<String, Pool<ConnectionManager>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
        }
    }

    /// Build a pool from `settings` and register it under `tag`, replacing
    /// any pool already held there. Old pool entries are simply dropped;
    /// in-flight borrows from a replaced pool are not interrupted.
    pub fn register(&mut self, tag: impl Into<String>, settings: PoolSettings) {
        let tag = tag.into();
        let pool = Pool::builder()
            .max_size(settings.max_connections)
            .min_idle(Some(settings.warm_idle))
            .idle_timeout(Some(settings.idle_timeout))
            .connection_timeout(settings.checkout_timeout)
            .test_on_check_out(true)
            .build_unchecked(ConnectionManager::new(&settings));
        log::debug!("registered redis pool `{tag}` for {}", settings.endpoint);
        self.pools.insert(tag, pool);
    }

    /// Drop every registered pool. Subsequent borrows against any tag fail
    /// until a pool is registered again.
    pub fn destroy_all(&mut self) {
        log::debug!("destroying {} redis pool(s)", self.pools.len());
        self.pools.clear();
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.pools.contains_key(tag)
    }

    /// Borrow one health-checked connection from the pool under `tag`.
    pub fn acquire(&self, tag: &str) -> Result<PooledConnection, Error> {
        let pool = self.pools.get(tag).ok_or_else(|| Error::UnknownTag {
            tag: tag.to_string(),
        })?;
        Ok(pool.get()?)
    }

    /// `GET key`, with a nil reply mapped to `None`.
    pub fn get(&self, tag: &str, key: &str) -> Result<Option<String>, Error> {
        let mut conn = self.acquire(tag)?;
        let value: Option<String> = redis::cmd("GET").arg(key).query(&mut *conn)?;
        Ok(value)
    }

    /// `SET key value`.
    pub fn set(&self, tag: &str, key: &str, value: &str) -> Result<(), Error> {
        let mut conn = self.acquire(tag)?;
        redis::cmd("SET").arg(key).arg(value).query::<()>(&mut *conn)?;
        Ok(())
    }

    /// `DEL key [key ...]`. A no-op for an empty key list.
    pub fn del(&self, tag: &str, keys: &[String]) -> Result<(), Error> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.acquire(tag)?;
        redis::cmd("DEL").arg(keys).query::<()>(&mut *conn)?;
        Ok(())
    }

    /// `EXISTS key`.
    pub fn exists(&self, tag: &str, key: &str) -> Result<bool, Error> {
        let mut conn = self.acquire(tag)?;
        let found: bool = redis::cmd("EXISTS").arg(key).query(&mut *conn)?;
        Ok(found)
    }

    /// `KEYS pattern`.
    pub fn keys(&self, tag: &str, pattern: &str) -> Result<Vec<String>, Error> {
        let mut conn = self.acquire(tag)?;
        let keys: Vec<String> = redis::cmd("KEYS").arg(pattern).query(&mut *conn)?;
        Ok(keys)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
