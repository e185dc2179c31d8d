use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Cannot read language-pack directory {}: {source}", .path.display())]
    Directory { path: PathBuf, source: io::Error },

    #[error("Remote backend error: {0}")]
    Remote(#[from] langpack_redis_kv::Error),
}
