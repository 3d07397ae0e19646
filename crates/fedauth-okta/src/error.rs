//! Errors that can occur when talking to the identity provider

use fedauth_saml::SamlError;
use reqwest::StatusCode;
use thiserror::Error;

/// Hard failures of a login attempt. Expected outcomes such as a wrong password are reported
/// through [`AuthOutcome`](crate::login::AuthOutcome) instead.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum OktaError {
    #[error("Organization, username and password must not be empty")]
    EmptyInput,

    #[error("No login in progress, authenticate first")]
    NotAuthenticated,

    #[error("Received unexpected response from the identity provider: [{status}] {body}")]
    UnknownError { status: StatusCode, body: String },

    #[error("The response received was missing a required field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Saml(#[from] SamlError),
}

/// Requires that a value is present or returns [`OktaError::MissingField`] otherwise.
macro_rules! require {
    ($val:expr, $field:literal) => {
        match $val {
            Some(val) => val,
            None => return Err($crate::OktaError::MissingField($field)),
        }
    };
}
pub(crate) use require;
