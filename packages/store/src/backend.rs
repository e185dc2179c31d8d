//! The storage seam between the loader and a concrete record store.

use crate::error::Error;

/// Where parsed text records are committed and looked up.
///
/// A backend is selected once, when the store is configured; the load and
/// query paths are identical across strategies. The trait is object-safe so
/// stores can hold a `Box<dyn Backend>`.
///
/// `lookup` takes `&self`: steady-state reads need no exclusive access, so a
/// shared store can serve queries from several threads once loading is done.
pub trait Backend: Send + Sync {
    /// Discard all previously committed records and prepare for a fresh
    /// bulk load.
    fn reset(&mut self) -> Result<(), Error>;

    /// Announce that records for `tag` are about to be committed.
    ///
    /// What this means is backend-specific: the in-memory backend starts the
    /// tag over with an empty table, while the remote backend leaves old
    /// keys in place to be overwritten record by record.
    fn begin_pack(&mut self, tag: &str) -> Result<(), Error>;

    /// Store one record under `(tag, id)`, replacing any previous text.
    fn commit(&mut self, tag: &str, id: i64, text: &str) -> Result<(), Error>;

    /// Fetch the text under `(tag, id)` if present.
    fn lookup(&self, tag: &str, id: i64) -> Result<Option<String>, Error>;
}

impl<T: Backend + ?Sized> Backend for Box<T> {
    fn reset(&mut self) -> Result<(), Error> {
        (**self).reset()
    }

    fn begin_pack(&mut self, tag: &str) -> Result<(), Error> {
        (**self).begin_pack(tag)
    }

    fn commit(&mut self, tag: &str, id: i64, text: &str) -> Result<(), Error> {
        (**self).commit(tag, id, text)
    }

    fn lookup(&self, tag: &str, id: i64) -> Result<Option<String>, Error> {
        (**self).lookup(tag, id)
    }
}

impl<T: Backend + ?Sized> Backend for &mut T {
    fn reset(&mut self) -> Result<(), Error> {
        (**self).reset()
    }

    fn begin_pack(&mut self, tag: &str) -> Result<(), Error> {
        (**self).begin_pack(tag)
    }

    fn commit(&mut self, tag: &str, id: i64, text: &str) -> Result<(), Error> {
        (**self).commit(tag, id, text)
    }

    fn lookup(&self, tag: &str, id: i64) -> Result<Option<String>, Error> {
        (**self).lookup(tag, id)
    }
}
