use fedauth_saml::SamlError;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while obtaining, tracking or persisting federated credentials.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum AwsError {
    #[error("Expiration `{value}` is not in the `YYYY-MM-DD HH:MM:SS+00:00` format")]
    InvalidExpiration {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Role assumption failed: {0}")]
    RoleAssumption(#[source] BoxError),

    #[error("Role {0} is not granted by the assertion")]
    RoleNotInAssertion(String),

    #[error("Unable to obtain an assertion for the session token: {0}")]
    AssertionSource(#[source] BoxError),

    #[error("A session token can only be exchanged when an assertion source is configured")]
    NoAssertionSource,

    #[error(transparent)]
    Saml(#[from] SamlError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    #[error("Unable to update the credentials file: {0}")]
    CredentialsFile(String),

    #[error("No role has been assumed yet")]
    NoSession,
}
