use std::{fs, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::AwsError;

/// What is recorded about the last assumed session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExpirationEntry {
    #[allow(missing_docs)]
    pub profile: String,
    #[allow(missing_docs)]
    pub region: String,
    #[allow(missing_docs)]
    pub output: String,
    /// Stored as `YYYY-MM-DD HH:MM:SS+00:00`, like every other expiration.
    #[serde(with = "crate::expiration::wire_format")]
    pub expiration_time: DateTime<Utc>,
}

/// JSON file recording when the current credentials expire, for shell prompts and scripts.
#[derive(Debug, Clone)]
pub struct ExpirationRecord {
    path: PathBuf,
}

impl ExpirationRecord {
    #[allow(missing_docs)]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.aws/fedauth-expiration.json`, if there is a home directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".aws").join("fedauth-expiration.json"))
    }

    /// Replaces the record, creating the file and its directory when missing.
    pub fn write(&self, entry: &ExpirationEntry) -> Result<(), AwsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(entry)?)?;

        info!("Wrote expiration time to {}", self.path.display());
        Ok(())
    }

    /// The current record, `None` when nothing was written yet.
    pub fn read(&self) -> Result<Option<ExpirationEntry>, AwsError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
