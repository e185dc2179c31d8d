//! # langpack-store
//!
//! Bulk-load localized text from flat language-pack files and serve point
//! lookups by language tag and numeric id, over interchangeable storage
//! backends.
//!
//! ## File format
//!
//! One file per language, UTF-8, newline-delimited. The first line is the
//! language tag; every other line is `<id><separator><text>`:
//!
//! ```text
//! en
//! 1~Hello
//! 2~World
//! ```
//!
//! By default files end in `.lps` (matched case-insensitively), fields are
//! split on `~`, and the current directory is scanned.
//!
//! ## Backends
//!
//! [`LoadMode::Memory`] keeps records in an in-process map;
//! [`LoadMode::Remote`] writes them to a Redis instance through a pooled
//! connection as `lang::<tag>::<id>` keys. The [`Backend`] trait is the
//! seam: both the loader and the query path are backend-agnostic, and
//! [`LangStore::with_backend`] accepts any other implementation.
//!
//! ## Loading and querying
//!
//! [`LangStore::load`] scans the directory and reports, per file, how many
//! lines looked like records (`estimate`) and how many the backend accepted
//! (`reality`). [`LangStore::query`] returns the text or an empty string;
//! [`LangStore::lookup`] keeps misses and backend failures apart for
//! callers that care.

pub mod backend;
pub mod config;
pub mod error;
pub mod loader;
pub mod memory;
pub mod pack;
pub mod remote;
pub mod store;

// Re-export main types
pub use backend::Backend;
pub use config::{LoadMode, RemoteSettings, StoreConfig};
pub use error::Error;
pub use loader::LoadResult;
pub use memory::MemoryBackend;
pub use pack::{PackFile, ParsedLine};
pub use remote::RemoteBackend;
pub use store::LangStore;
