//! Configuration for the resource store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Storage strategy for loaded text records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Records live in an in-process map.
    #[default]
    Memory,
    /// Records live in a remote Redis instance reached through a pooled
    /// connection.
    Remote,
}

/// Connection details for the remote backend. Ignored in memory mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// `host:port` of the remote store.
    #[serde(default)]
    pub endpoint: String,
    /// Password sent during the connection handshake, if any.
    #[serde(default)]
    pub credential: Option<String>,
    /// Database index selected after connecting.
    #[serde(default)]
    pub database: i64,
}

impl RemoteSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credential: None,
            database: 0,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_database(mut self, database: i64) -> Self {
        self.database = database;
        self
    }
}

/// Where language-pack files live and how their lines are split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory scanned for language-pack files. Not recursive.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// File-name suffix a candidate must carry, matched case-insensitively.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Separator between the identifier field and the text field.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Active storage strategy.
    #[serde(default)]
    pub mode: LoadMode,
    /// Remote connection details, used when `mode` is [`LoadMode::Remote`].
    #[serde(default)]
    pub remote: RemoteSettings,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_suffix() -> String {
    ".lps".to_string()
}

fn default_separator() -> String {
    "~".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            suffix: default_suffix(),
            separator: default_separator(),
            mode: LoadMode::default(),
            remote: RemoteSettings::default(),
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_remote(mut self, remote: RemoteSettings) -> Self {
        self.remote = remote;
        self
    }

    /// Fill empty fields back in with the defaults and lowercase the suffix,
    /// so suffix matching stays case-insensitive no matter how the value was
    /// spelled.
    pub(crate) fn normalized(mut self) -> Self {
        if self.directory.as_os_str().is_empty() {
            self.directory = default_directory();
        }
        if self.suffix.is_empty() {
            self.suffix = default_suffix();
        } else {
            self.suffix = self.suffix.to_lowercase();
        }
        if self.separator.is_empty() {
            self.separator = default_separator();
        }
        self
    }
}
