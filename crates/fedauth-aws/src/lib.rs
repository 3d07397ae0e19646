#![doc = include_str!("../README.md")]

mod assumer;
mod credentials_file;
mod error;
mod expiration;
mod expiration_record;
mod federated_session;
mod session;
mod sts;

pub use assumer::{AssertionSource, RoleAssumer, RoleAssumptionRequest, RoleCredentials};
pub use credentials_file::{
    CredentialWriter, CredentialsFile, DEFAULT_PROFILE, Profile, write_profiles,
};
pub use error::AwsError;
pub use expiration::{EXPIRATION_FORMAT, format_expiration, parse_expiration};
pub use expiration_record::{ExpirationEntry, ExpirationRecord};
pub use federated_session::{FederatedSession, FederationCredential};
pub use session::{AssumedSession, RENEWAL_BUFFER, ValidityWindow};
pub use sts::StsRoleAssumer;
