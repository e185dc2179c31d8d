//! Directory scan and bulk load of language-pack files.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::error::Error;
use crate::pack::{PackFile, ParsedLine};

/// Per-file outcome of a bulk load.
///
/// `estimate` counts lines with the correct two-field shape; `reality`
/// counts lines the backend actually accepted. `reality <= estimate` always
/// holds: a non-integer identifier or a failed backend write drops a line
/// from `reality` without aborting the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadResult {
    /// Language tag from the file's first line.
    pub tag: String,
    /// Path of the file as enumerated.
    pub path: PathBuf,
    /// Lines with the correct field shape.
    pub estimate: usize,
    /// Lines committed to the backend.
    pub reality: usize,
}

/// Scan `directory` and load every matching file into `backend`.
///
/// The directory must be enumerable; that is checked before the backend is
/// reset, so a bad path leaves previously loaded state alone. Results come
/// back in directory-enumeration order, which is filesystem-dependent.
pub(crate) fn load_directory(
    directory: &Path,
    suffix: &str,
    separator: &str,
    backend: &mut dyn Backend,
) -> Result<Vec<LoadResult>, Error> {
    let entries = fs::read_dir(directory).map_err(|source| Error::Directory {
        path: directory.to_path_buf(),
        source,
    })?;
    log::debug!("loading language packs from {}", directory.display());

    backend.reset()?;

    let mut results = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                log::warn!(
                    "skipping unreadable entry in {}: {error}",
                    directory.display()
                );
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() || !has_suffix(&entry.file_name(), suffix) {
            continue;
        }
        match load_file(&path, separator, backend) {
            Ok(Some(result)) => {
                log::debug!(
                    "loaded {}: tag `{}`, {}/{} records",
                    path.display(),
                    result.tag,
                    result.reality,
                    result.estimate
                );
                results.push(result);
            }
            Ok(None) => log::debug!("skipping {}: no language tag", path.display()),
            Err(error) => log::warn!("skipping {}: {error}", path.display()),
        }
    }
    Ok(results)
}

/// Case-insensitive suffix match on the file name. Non-UTF-8 names never
/// match.
fn has_suffix(name: &OsStr, suffix: &str) -> bool {
    name.to_str()
        .map(|name| name.to_lowercase().ends_with(suffix))
        .unwrap_or(false)
}

/// Parse one file and commit its records. `Ok(None)` when the file has no
/// usable language tag.
fn load_file(
    path: &Path,
    separator: &str,
    backend: &mut dyn Backend,
) -> io::Result<Option<LoadResult>> {
    let pack = match PackFile::open(path, separator)? {
        Some(pack) => pack,
        None => return Ok(None),
    };
    let tag = pack.tag().to_string();
    if let Err(error) = backend.begin_pack(&tag) {
        log::warn!("backend refused pack `{tag}`: {error}");
    }

    let mut estimate = 0;
    let mut reality = 0;
    for line in pack {
        match line {
            ParsedLine::Record { id, text } => {
                estimate += 1;
                match backend.commit(&tag, id, &text) {
                    Ok(()) => reality += 1,
                    Err(error) => log::trace!("commit failed for {tag}/{id}: {error}"),
                }
            }
            ParsedLine::BadId => estimate += 1,
        }
    }
    Ok(Some(LoadResult {
        tag,
        path: path.to_path_buf(),
        estimate,
        reality,
    }))
}
