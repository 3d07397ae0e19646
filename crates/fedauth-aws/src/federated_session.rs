use std::{borrow::Cow, sync::Arc};

use fedauth_saml::{RoleEntry, SamlAssertion};
use tracing::{debug, info, instrument};

use crate::{
    AssertionSource, AssumedSession, AwsError, RoleAssumer, RoleAssumptionRequest,
    format_expiration,
};

/// What a role assumption is authorized with.
#[derive(Debug, Clone)]
pub enum FederationCredential {
    /// An identity provider session token, redeemed for a fresh assertion through the
    /// configured [`AssertionSource`]. This is the path renewals take.
    SessionToken(String),
    /// An assertion obtained beforehand, exchanged as is.
    Assertion(SamlAssertion),
}

/// Owner of the current [`AssumedSession`] and the only source of truth for its validity.
#[derive(Debug)]
pub struct FederatedSession {
    assumer: Arc<dyn RoleAssumer>,
    assertion_source: Option<Arc<dyn AssertionSource>>,
    duration_seconds: Option<i32>,
    current: Option<AssumedSession>,
}

impl FederatedSession {
    #[allow(missing_docs)]
    pub fn new(assumer: Arc<dyn RoleAssumer>) -> Self {
        Self {
            assumer,
            assertion_source: None,
            duration_seconds: None,
            current: None,
        }
    }

    /// Enables [`FederationCredential::SessionToken`].
    pub fn with_assertion_source(mut self, source: Arc<dyn AssertionSource>) -> Self {
        self.assertion_source = Some(source);
        self
    }

    /// Requests sessions lasting `seconds` instead of the service default.
    pub fn with_duration(mut self, seconds: i32) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    /// Assumes `role` and replaces the current session with the result.
    ///
    /// With a session token the assertion is fetched first, and `role` must be one of the roles
    /// it grants.
    #[instrument(skip_all, fields(role = %role))]
    pub async fn assume(
        &mut self,
        role: &RoleEntry,
        credential: &FederationCredential,
    ) -> Result<&AssumedSession, AwsError> {
        let assertion = match credential {
            FederationCredential::Assertion(assertion) => Cow::Borrowed(assertion),
            FederationCredential::SessionToken(session_token) => {
                let source = self
                    .assertion_source
                    .as_ref()
                    .ok_or(AwsError::NoAssertionSource)?;
                let assertion = source.fetch_assertion(session_token).await?;

                if !assertion.roles()?.contains(role) {
                    return Err(AwsError::RoleNotInAssertion(role.role_arn.clone()));
                }
                debug!("Fresh assertion fetched");
                Cow::Owned(assertion)
            }
        };

        info!("Assuming: {}", role.role_arn);
        let credentials = self
            .assumer
            .assume_role_with_saml(RoleAssumptionRequest {
                role_arn: &role.role_arn,
                principal_arn: &role.principal_arn,
                assertion: assertion.encoded(),
                duration_seconds: self.duration_seconds,
            })
            .await?;

        let session = AssumedSession::from_credentials(credentials)?;
        info!("Session expires at {}", format_expiration(&session.expiration));

        Ok(self.current.insert(session))
    }

    /// The session of the last successful [`FederatedSession::assume`].
    pub fn current(&self) -> Option<&AssumedSession> {
        self.current.as_ref()
    }

    /// Whether the current session has not expired yet.
    pub fn is_session_valid(&self) -> Result<bool, AwsError> {
        Ok(self.require_current()?.validity().is_valid())
    }

    /// Whether more than the renewal buffer is left on the current session.
    pub fn is_within_renewal_buffer(&self) -> Result<bool, AwsError> {
        Ok(self.require_current()?.validity().is_within_renewal_buffer())
    }

    fn require_current(&self) -> Result<&AssumedSession, AwsError> {
        self.current.as_ref().ok_or(AwsError::NoSession)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{TimeDelta, Utc};
    use fedauth_test::documents::{assertion_xml, embed_link_html, principal_arn, role_arn};

    use super::*;
    use crate::{EXPIRATION_FORMAT, RoleCredentials};

    /// Records requests and answers with credentials expiring `expires_in` from now.
    #[derive(Debug)]
    struct MockAssumer {
        expires_in: TimeDelta,
        requests: Mutex<Vec<(String, String, Option<i32>)>>,
    }

    impl MockAssumer {
        fn expiring_in(expires_in: TimeDelta) -> Arc<Self> {
            Arc::new(Self {
                expires_in,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl RoleAssumer for MockAssumer {
        async fn assume_role_with_saml(
            &self,
            request: RoleAssumptionRequest<'_>,
        ) -> Result<RoleCredentials, AwsError> {
            self.requests.lock().unwrap().push((
                request.role_arn.to_owned(),
                request.assertion.to_owned(),
                request.duration_seconds,
            ));

            Ok(RoleCredentials {
                access_key_id: "AKIA".to_string(),
                secret_access_key: "secret".to_string(),
                session_token: "session".to_string(),
                expiration: (Utc::now() + self.expires_in)
                    .format(EXPIRATION_FORMAT)
                    .to_string(),
            })
        }
    }

    /// Serves the same assertion for every session token.
    #[derive(Debug)]
    struct FixedSource {
        html: String,
    }

    #[async_trait::async_trait]
    impl AssertionSource for FixedSource {
        async fn fetch_assertion(&self, _session_token: &str) -> Result<SamlAssertion, AwsError> {
            Ok(SamlAssertion::from_html(&self.html)?)
        }
    }

    fn source_granting(roles: &[&str]) -> Arc<FixedSource> {
        Arc::new(FixedSource {
            html: embed_link_html(&assertion_xml(roles)),
        })
    }

    fn admin() -> RoleEntry {
        RoleEntry::new(role_arn("Admin"), principal_arn())
    }

    #[tokio::test]
    async fn assertion_is_exchanged_as_is() {
        let assumer = MockAssumer::expiring_in(TimeDelta::hours(1));
        let assertion =
            SamlAssertion::from_html(&embed_link_html(&assertion_xml(&["Admin"]))).unwrap();
        let mut session = FederatedSession::new(assumer.clone()).with_duration(900);

        let assumed = session
            .assume(&admin(), &FederationCredential::Assertion(assertion.clone()))
            .await
            .unwrap();

        assert_eq!(assumed.access_key_id, "AKIA");
        assert_eq!(
            *assumer.requests.lock().unwrap(),
            vec![(role_arn("Admin"), assertion.encoded().to_owned(), Some(900))]
        );
        assert!(session.is_session_valid().unwrap());
        assert!(session.is_within_renewal_buffer().unwrap());
    }

    #[tokio::test]
    async fn session_token_fetches_an_assertion() {
        let assumer = MockAssumer::expiring_in(TimeDelta::hours(1));
        let mut session =
            FederatedSession::new(assumer.clone()).with_assertion_source(source_granting(&["Admin"]));

        session
            .assume(&admin(), &FederationCredential::SessionToken("tok".to_string()))
            .await
            .unwrap();

        assert_eq!(assumer.requests.lock().unwrap().len(), 1);
        assert!(session.current().is_some());
    }

    #[tokio::test]
    async fn session_token_requires_a_source() {
        let mut session = FederatedSession::new(MockAssumer::expiring_in(TimeDelta::hours(1)));

        let result = session
            .assume(&admin(), &FederationCredential::SessionToken("tok".to_string()))
            .await;

        assert!(matches!(result, Err(AwsError::NoAssertionSource)));
    }

    #[tokio::test]
    async fn role_must_be_granted_by_the_fresh_assertion() {
        let assumer = MockAssumer::expiring_in(TimeDelta::hours(1));
        let mut session = FederatedSession::new(assumer.clone())
            .with_assertion_source(source_granting(&["ReadOnly"]));

        let result = session
            .assume(&admin(), &FederationCredential::SessionToken("tok".to_string()))
            .await;

        assert!(matches!(result, Err(AwsError::RoleNotInAssertion(arn)) if arn == role_arn("Admin")));
        assert!(assumer.requests.lock().unwrap().is_empty());
        assert!(matches!(session.is_session_valid(), Err(AwsError::NoSession)));
    }

    #[tokio::test]
    async fn short_session_needs_renewal() {
        let mut session =
            FederatedSession::new(MockAssumer::expiring_in(TimeDelta::minutes(9)))
                .with_assertion_source(source_granting(&["Admin"]));

        session
            .assume(&admin(), &FederationCredential::SessionToken("tok".to_string()))
            .await
            .unwrap();

        assert!(session.is_session_valid().unwrap());
        assert!(!session.is_within_renewal_buffer().unwrap());
    }

    #[tokio::test]
    async fn renewal_replaces_the_session() {
        let assumer = MockAssumer::expiring_in(TimeDelta::hours(1));
        let mut session =
            FederatedSession::new(assumer.clone()).with_assertion_source(source_granting(&["Admin"]));
        let credential = FederationCredential::SessionToken("tok".to_string());

        let first = session.assume(&admin(), &credential).await.unwrap().expiration;
        let second = session.assume(&admin(), &credential).await.unwrap().expiration;

        assert!(second >= first);
        assert_eq!(assumer.requests.lock().unwrap().len(), 2);
    }

    #[test]
    fn no_session_before_assuming() {
        let session = FederatedSession::new(MockAssumer::expiring_in(TimeDelta::hours(1)));

        assert!(session.current().is_none());
        assert!(matches!(session.is_within_renewal_buffer(), Err(AwsError::NoSession)));
    }
}
