//! Seams to the external services a federated session depends on.

use fedauth_saml::SamlAssertion;

use crate::AwsError;

/// What is sent to the role-assumption service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAssumptionRequest<'a> {
    #[allow(missing_docs)]
    pub role_arn: &'a str,
    #[allow(missing_docs)]
    pub principal_arn: &'a str,
    /// The base64 encoded assertion.
    pub assertion: &'a str,
    /// Requested session lifetime, the service default when `None`.
    pub duration_seconds: Option<i32>,
}

/// Temporary credentials as the role-assumption service hands them out.
#[derive(Clone, PartialEq, Eq)]
pub struct RoleCredentials {
    #[allow(missing_docs)]
    pub access_key_id: String,
    #[allow(missing_docs)]
    pub secret_access_key: String,
    #[allow(missing_docs)]
    pub session_token: String,
    /// Expiration in the `YYYY-MM-DD HH:MM:SS+00:00` wire format.
    pub expiration: String,
}

impl std::fmt::Debug for RoleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}

/// Exchanges a federation assertion for temporary credentials.
#[async_trait::async_trait]
pub trait RoleAssumer: std::fmt::Debug + Send + Sync {
    /// Assumes `request.role_arn` on the strength of `request.assertion`.
    async fn assume_role_with_saml(
        &self,
        request: RoleAssumptionRequest<'_>,
    ) -> Result<RoleCredentials, AwsError>;
}

/// Redeems an identity provider session token for a fresh federation assertion.
#[async_trait::async_trait]
pub trait AssertionSource: std::fmt::Debug + Send + Sync {
    /// Fetches an assertion for `session_token`.
    async fn fetch_assertion(&self, session_token: &str) -> Result<SamlAssertion, AwsError>;
}
