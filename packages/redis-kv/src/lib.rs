//! # langpack-redis-kv
//!
//! Named Redis connection pools and one-shot command helpers.
//!
//! A [`Registry`] owns pools keyed by a logical tag. Registering a pool never
//! dials; connections are established on first borrow, health-checked with
//! `PING` before every reuse, and returned to the pool when the borrow is
//! dropped. The one-shot helpers (`get`, `set`, `del`, `exists`, `keys`)
//! wrap the borrow-command-release cycle for callers that issue a single
//! command at a time.
//!
//! ## Example
//!
//! ```ignore
//! use langpack_redis_kv::{PoolSettings, Registry};
//!
//! let mut registry = Registry::new();
//! registry.register(
//!     "cache",
//!     PoolSettings::new("127.0.0.1:6379").with_database(2),
//! );
//!
//! registry.set("cache", "greeting", "hello")?;
//! assert_eq!(registry.get("cache", "greeting")?, Some("hello".to_string()));
//! ```
//!
//! ## Test support
//!
//! With the `test-util` feature enabled, [`mock::MockRedis`] provides an
//! in-process server speaking enough of the protocol to exercise pools and
//! commands without a real Redis instance.

pub mod error;
pub mod manager;
pub mod registry;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

// Re-export main types
pub use error::Error;
pub use manager::{ConnectionManager, PoolSettings};
pub use registry::{PooledConnection, Registry};
