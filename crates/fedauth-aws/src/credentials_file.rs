use std::{
    fs,
    path::{Path, PathBuf},
};

use configparser::ini::Ini;
use tracing::info;

use crate::{AssumedSession, AwsError};

/// Section holding lines found before the first section header. It never matches a profile,
/// so `[default]` is written back with its header.
const UNSECTIONED: &str = "\u{0}unsectioned";

/// Profile the cloud tooling falls back to.
pub const DEFAULT_PROFILE: &str = "default";

/// Content of one credentials profile.
#[derive(Debug, Clone, Copy)]
pub struct Profile<'a> {
    #[allow(missing_docs)]
    pub region: &'a str,
    /// Output format of the cloud CLI.
    pub output: &'a str,
    #[allow(missing_docs)]
    pub session: &'a AssumedSession,
}

impl Profile<'_> {
    fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("output", self.output),
            ("region", self.region),
            ("aws_access_key_id", &self.session.access_key_id),
            ("aws_secret_access_key", &self.session.secret_access_key),
            ("aws_security_token", &self.session.session_token),
            ("aws_session_token", &self.session.session_token),
        ]
    }
}

/// Persists credentials profiles.
pub trait CredentialWriter {
    /// Writes `profile` under `name`, replacing the keys it already has there.
    fn write_profile(&self, name: &str, profile: &Profile<'_>) -> Result<(), AwsError>;
}

/// Writes `profile` as the default profile and as `role_profile`.
pub fn write_profiles(
    writer: &dyn CredentialWriter,
    role_profile: &str,
    profile: &Profile<'_>,
) -> Result<(), AwsError> {
    writer.write_profile(DEFAULT_PROFILE, profile)?;
    if role_profile != DEFAULT_PROFILE {
        writer.write_profile(role_profile, profile)?;
    }
    Ok(())
}

/// An INI credentials file, e.g. `~/.aws/credentials`.
///
/// Other profiles and keys in the file are preserved. A missing file, and its directory, are
/// created on first write.
#[derive(Debug, Clone)]
pub struct CredentialsFile {
    path: PathBuf,
}

impl CredentialsFile {
    #[allow(missing_docs)]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.aws/credentials`, if there is a home directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".aws").join("credentials"))
    }

    #[allow(missing_docs)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Ini, AwsError> {
        let mut ini = Ini::new_cs();
        ini.set_default_section(UNSECTIONED);
        // `;` and `#` are plain value characters unless they start the line.
        ini.set_inline_comment_symbols(Some(&[]));

        if self.path.exists() {
            ini.load(&self.path).map_err(AwsError::CredentialsFile)?;
        }
        Ok(ini)
    }
}

impl CredentialWriter for CredentialsFile {
    fn write_profile(&self, name: &str, profile: &Profile<'_>) -> Result<(), AwsError> {
        let mut ini = self.load()?;
        for (key, value) in profile.entries() {
            ini.set(name, key, Some(value.to_owned()));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating credentials directory {}", parent.display());
                fs::create_dir_all(parent)?;
            }
        }
        ini.write(&self.path)?;

        if name == DEFAULT_PROFILE {
            info!("Updated default profile");
        } else {
            info!("Wrote profile \"{name}\" to {}", self.path.display());
        }
        Ok(())
    }
}
