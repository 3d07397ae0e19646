use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

use crate::{AwsError, RoleCredentials, parse_expiration};

/// How long before expiration a session is due for renewal.
pub const RENEWAL_BUFFER: TimeDelta = TimeDelta::seconds(600);

/// Temporary credentials obtained by assuming a role. A renewal replaces the whole session.
#[derive(Clone, PartialEq, Eq)]
pub struct AssumedSession {
    #[allow(missing_docs)]
    pub access_key_id: String,
    #[allow(missing_docs)]
    pub secret_access_key: String,
    #[allow(missing_docs)]
    pub session_token: String,
    #[allow(missing_docs)]
    pub expiration: DateTime<Utc>,
}

impl AssumedSession {
    /// Builds a session from what the role-assumption service returned, parsing its expiration.
    pub fn from_credentials(credentials: RoleCredentials) -> Result<Self, AwsError> {
        Ok(Self {
            expiration: parse_expiration(&credentials.expiration)?,
            access_key_id: credentials.access_key_id,
            secret_access_key: credentials.secret_access_key,
            session_token: credentials.session_token,
        })
    }

    /// The validity window as of `now`.
    pub fn validity_at(&self, now: DateTime<Utc>) -> ValidityWindow {
        ValidityWindow {
            expiration: self.expiration,
            now,
        }
    }

    /// The validity window as of the current time.
    pub fn validity(&self) -> ValidityWindow {
        self.validity_at(Utc::now())
    }
}

impl fmt::Debug for AssumedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssumedSession")
            .field("access_key_id", &self.access_key_id)
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}

/// A session expiration looked at from a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    #[allow(missing_docs)]
    pub expiration: DateTime<Utc>,
    #[allow(missing_docs)]
    pub now: DateTime<Utc>,
}

impl ValidityWindow {
    /// The credentials have not expired yet.
    pub fn is_valid(&self) -> bool {
        self.now < self.expiration
    }

    /// More than [`RENEWAL_BUFFER`] is left before expiration.
    pub fn is_within_renewal_buffer(&self) -> bool {
        self.now + RENEWAL_BUFFER < self.expiration
    }

    /// [`RENEWAL_BUFFER`] or less is left, the session should be replaced.
    pub fn needs_renewal(&self) -> bool {
        !self.is_within_renewal_buffer()
    }

    /// Time left before expiration, negative once expired.
    pub fn remaining(&self) -> TimeDelta {
        self.expiration - self.now
    }
}
