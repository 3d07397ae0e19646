use reqwest::StatusCode;
use tracing::{debug, info, instrument, warn};

use super::{AuthOutcome, Credentials, FactorType, PushCancellation, PushVerification};
use crate::{
    OktaClient,
    OktaError,
    api::{AuthnApiRequest, AuthnApiResponse},
    error::require,
};

impl OktaClient {
    /// Logs in with a username and password, driving the multi-factor step when one is
    /// required.
    ///
    /// A push factor is tried first and polled until the user answers it. Cancelling the token
    /// `cancel` hands out gives up on the push and falls back to a passcode factor when the
    /// account has one. The token is requested only when a push is about to be sent.
    #[instrument(skip_all, fields(organization = %credentials.organization, username = %credentials.username))]
    pub async fn authenticate(
        &mut self,
        credentials: &Credentials,
        cancel: &dyn PushCancellation,
    ) -> Result<AuthOutcome, OktaError> {
        credentials.validate()?;

        self.base_url = Some(self.settings.base_url_for(&credentials.organization));
        self.session_token = None;
        debug!(base_url = ?self.base_url, "Logging in");

        let request = AuthnApiRequest {
            username: &credentials.username,
            password: &credentials.password,
        };
        let response = self
            .transport
            .post_json(&self.api_url("/authn")?, &request)
            .await?;

        if response.status == StatusCode::UNAUTHORIZED {
            warn!("Invalid username or password");
            return Ok(AuthOutcome::InvalidPassword);
        }
        let response: AuthnApiResponse = response.error_for_status()?.json()?;
        debug!(status = ?response.status, "Login response received");

        match response.status.as_deref() {
            Some("SUCCESS") => {
                let session_token = self.store_session_token(&response)?;
                Ok(AuthOutcome::Success { session_token })
            }
            Some("MFA_ENROLL" | "MFA_ENROLL_ACTIVATE") => {
                warn!(
                    "User {} needs to enroll in multi-factor authentication first",
                    credentials.username
                );
                Ok(AuthOutcome::EnrollmentRequired)
            }
            Some("MFA_REQUIRED" | "MFA_CHALLENGE") => self.dispatch_factors(&response, cancel).await,
            other => Ok(AuthOutcome::Unknown {
                raw_status: other.map(str::to_owned),
            }),
        }
    }

    async fn dispatch_factors(
        &mut self,
        response: &AuthnApiResponse,
        cancel: &dyn PushCancellation,
    ) -> Result<AuthOutcome, OktaError> {
        let factors = response.factors();
        info!(count = factors.len(), "Multi-factor authentication required");

        let pushes: Vec<_> = factors
            .iter()
            .filter(|f| f.factor_type == FactorType::Push)
            .collect();
        let totp = factors.iter().find(|f| f.factor_type == FactorType::Totp);
        if pushes.is_empty() && totp.is_none() {
            warn!("No supported multi-factor authentication factor");
            return Ok(AuthOutcome::Unknown {
                raw_status: response.status.clone(),
            });
        }
        let state_token = require!(response.state_token.as_deref(), "stateToken");

        // Last push tried and whether its wait was cancelled.
        let mut last_push = None;
        if !pushes.is_empty() {
            let cancel = cancel.push_wait_started();
            for factor in pushes {
                match self.verify_push(&factor.id, state_token, &cancel).await? {
                    PushVerification::Approved { session_token } => {
                        return Ok(AuthOutcome::Success { session_token });
                    }
                    PushVerification::Rejected => last_push = Some((factor, false)),
                    PushVerification::Cancelled => {
                        last_push = Some((factor, true));
                        break;
                    }
                }
            }
        }

        if let Some(totp) = totp {
            return Ok(AuthOutcome::PasscodeChallenge {
                factor_id: totp.id.clone(),
                state_token: state_token.to_owned(),
            });
        }

        Ok(match last_push {
            Some((factor, true)) => AuthOutcome::PushPending {
                factor_id: factor.id.clone(),
                state_token: state_token.to_owned(),
            },
            Some((factor, false)) => AuthOutcome::PushRejected {
                factor_id: factor.id.clone(),
                state_token: state_token.to_owned(),
            },
            None => AuthOutcome::Unknown {
                raw_status: response.status.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use fedauth_test::{
        documents::{mfa_required_response, push_rejected_response, status_response, success_response},
        start_provider_mock,
    };
    use serde_json::json;
    use tokio_util::sync::CancellationToken;
    use wiremock::{
        Mock,
        MockServer,
        ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use super::*;
    use crate::ClientSettings;

    fn client_for(server: &MockServer) -> OktaClient {
        OktaClient::new(ClientSettings {
            base_url: Some(server.uri()),
            push_poll_interval: Duration::from_millis(1),
            ..Default::default()
        })
        .unwrap()
    }

    fn authn_mock(template: ResponseTemplate) -> Mock {
        Mock::given(method("POST"))
            .and(path("/api/v1/authn"))
            .respond_with(template)
    }

    fn credentials() -> Credentials {
        Credentials::new("acme", "u", "p")
    }

    #[tokio::test]
    async fn success_returns_the_session_token() {
        let server = start_provider_mock(vec![Mock::given(method("POST"))
            .and(path("/api/v1/authn"))
            .and(body_json(json!({ "username": "u", "password": "p" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_response("tok1")))
            .expect(1)])
        .await;
        let mut client = client_for(&server);

        let outcome = client
            .authenticate(&credentials(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            AuthOutcome::Success {
                session_token: "tok1".to_string()
            }
        );
        assert_eq!(client.session_token(), Some("tok1"));
    }

    #[tokio::test]
    async fn empty_input_makes_no_request() {
        let server = start_provider_mock(vec![authn_mock(
            ResponseTemplate::new(200).set_body_json(success_response("tok1")),
        )])
        .await;
        let mut client = client_for(&server);

        for credentials in [
            Credentials::new("", "u", "p"),
            Credentials::new("acme", "", "p"),
            Credentials::new("acme", "u", ""),
        ] {
            let result = client
                .authenticate(&credentials, &CancellationToken::new())
                .await;
            assert!(matches!(result, Err(OktaError::EmptyInput)));
        }

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unauthorized_is_an_invalid_password() {
        let server = start_provider_mock(vec![authn_mock(
            ResponseTemplate::new(401).set_body_string("not even json"),
        )])
        .await;
        let mut client = client_for(&server);

        let outcome = client
            .authenticate(&credentials(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome, AuthOutcome::InvalidPassword);
    }

    #[tokio::test]
    async fn other_error_status_carries_the_body() {
        let server = start_provider_mock(vec![authn_mock(
            ResponseTemplate::new(500).set_body_string("upstream down"),
        )])
        .await;
        let mut client = client_for(&server);

        let result = client
            .authenticate(&credentials(), &CancellationToken::new())
            .await;

        match result {
            Err(OktaError::UnknownError { status, body }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "upstream down");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test]
    async fn enrollment_statuses() {
        for status in ["MFA_ENROLL", "MFA_ENROLL_ACTIVATE"] {
            let server = start_provider_mock(vec![authn_mock(
                ResponseTemplate::new(200).set_body_json(status_response(status)),
            )])
            .await;
            let mut client = client_for(&server);

            let outcome = client
                .authenticate(&credentials(), &CancellationToken::new())
                .await
                .unwrap();

            assert_eq!(outcome, AuthOutcome::EnrollmentRequired);
        }
    }

    #[tokio::test]
    async fn unexpected_status_is_unknown() {
        let server = start_provider_mock(vec![authn_mock(
            ResponseTemplate::new(200).set_body_json(status_response("LOCKED_OUT")),
        )])
        .await;
        let mut client = client_for(&server);

        let outcome = client
            .authenticate(&credentials(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            AuthOutcome::Unknown {
                raw_status: Some("LOCKED_OUT".to_string())
            }
        );
    }

    #[tokio::test]
    async fn totp_only_asks_for_a_passcode() {
        let server = start_provider_mock(vec![authn_mock(
            ResponseTemplate::new(200).set_body_json(mfa_required_response(
                "state",
                &[("sms1", "sms"), ("totp1", "token:software:totp")],
            )),
        )])
        .await;
        let mut client = client_for(&server);

        let outcome = client
            .authenticate(&credentials(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            AuthOutcome::PasscodeChallenge {
                factor_id: "totp1".to_string(),
                state_token: "state".to_string()
            }
        );
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn no_supported_factor_is_unknown() {
        let server = start_provider_mock(vec![authn_mock(
            ResponseTemplate::new(200)
                .set_body_json(mfa_required_response("state", &[("sms1", "sms")])),
        )])
        .await;
        let mut client = client_for(&server);

        let outcome = client
            .authenticate(&credentials(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            AuthOutcome::Unknown {
                raw_status: Some("MFA_REQUIRED".to_string())
            }
        );
    }

    #[tokio::test]
    async fn approved_push_logs_in() {
        let server = start_provider_mock(vec![
            authn_mock(ResponseTemplate::new(200).set_body_json(mfa_required_response(
                "state",
                &[("push1", "push"), ("totp1", "token:software:totp")],
            ))),
            Mock::given(method("POST"))
                .and(path("/api/v1/authn/factors/push1/verify"))
                .and(body_json(json!({ "fid": "push1", "stateToken": "state" })))
                .respond_with(ResponseTemplate::new(200).set_body_json(success_response("tok2")))
                .expect(1),
        ])
        .await;
        let mut client = client_for(&server);

        let outcome = client
            .authenticate(&credentials(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            AuthOutcome::Success {
                session_token: "tok2".to_string()
            }
        );
    }

    #[tokio::test]
    async fn rejected_push_falls_back_to_passcode() {
        let server = start_provider_mock(vec![
            authn_mock(ResponseTemplate::new(200).set_body_json(mfa_required_response(
                "state",
                &[("push1", "push"), ("totp1", "token:software:totp")],
            ))),
            Mock::given(method("POST"))
                .and(path("/api/v1/authn/factors/push1/verify"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(push_rejected_response("state")),
                )
                .expect(1),
        ])
        .await;
        let mut client = client_for(&server);

        let outcome = client
            .authenticate(&credentials(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            AuthOutcome::PasscodeChallenge {
                factor_id: "totp1".to_string(),
                state_token: "state".to_string()
            }
        );
    }

    #[tokio::test]
    async fn every_push_is_tried_before_giving_up() {
        let server = start_provider_mock(vec![
            authn_mock(ResponseTemplate::new(200).set_body_json(mfa_required_response(
                "state",
                &[("push1", "push"), ("push2", "push")],
            ))),
            Mock::given(method("POST"))
                .and(path("/api/v1/authn/factors/push1/verify"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(push_rejected_response("state")),
                )
                .expect(1),
            Mock::given(method("POST"))
                .and(path("/api/v1/authn/factors/push2/verify"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(push_rejected_response("state")),
                )
                .expect(1),
        ])
        .await;
        let mut client = client_for(&server);

        let outcome = client
            .authenticate(&credentials(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            AuthOutcome::PushRejected {
                factor_id: "push2".to_string(),
                state_token: "state".to_string()
            }
        );
    }

    #[tokio::test]
    async fn cancelled_push_falls_back_to_passcode() {
        let server = start_provider_mock(vec![
            authn_mock(ResponseTemplate::new(200).set_body_json(mfa_required_response(
                "state",
                &[("push1", "push"), ("totp1", "token:software:totp")],
            ))),
            Mock::given(method("POST"))
                .and(path("/api/v1/authn/factors/push1/verify"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "stateToken": "state",
                    "status": "MFA_CHALLENGE",
                    "factorResult": "WAITING",
                    "_links": { "next": { "href": "http://127.0.0.1:1/never" } }
                })))
                .expect(1),
        ])
        .await;
        let mut client = client_for(&server);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = client.authenticate(&credentials(), &cancel).await.unwrap();

        assert_eq!(
            outcome,
            AuthOutcome::PasscodeChallenge {
                factor_id: "totp1".to_string(),
                state_token: "state".to_string()
            }
        );
    }

    #[tokio::test]
    async fn cancelled_push_without_passcode_is_pending() {
        let server = start_provider_mock(vec![
            authn_mock(
                ResponseTemplate::new(200)
                    .set_body_json(mfa_required_response("state", &[("push1", "push")])),
            ),
            Mock::given(method("POST"))
                .and(path("/api/v1/authn/factors/push1/verify"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "stateToken": "state",
                    "status": "MFA_CHALLENGE",
                    "factorResult": "WAITING",
                    "_links": { "next": { "href": "http://127.0.0.1:1/never" } }
                }))),
        ])
        .await;
        let mut client = client_for(&server);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = client.authenticate(&credentials(), &cancel).await.unwrap();

        assert_eq!(
            outcome,
            AuthOutcome::PushPending {
                factor_id: "push1".to_string(),
                state_token: "state".to_string()
            }
        );
    }

    /// Counts how often a push wait token was asked for.
    #[derive(Default)]
    struct CountingCancellation {
        requested: AtomicUsize,
    }

    impl PushCancellation for CountingCancellation {
        fn push_wait_started(&self) -> CancellationToken {
            self.requested.fetch_add(1, Ordering::SeqCst);
            CancellationToken::new()
        }
    }

    #[tokio::test]
    async fn unsupported_factors_without_state_token_are_unknown() {
        let server = start_provider_mock(vec![authn_mock(
            ResponseTemplate::new(200).set_body_json(json!({
                "status": "MFA_REQUIRED",
                "_embedded": { "factors": [{ "id": "s", "factorType": "sms" }] }
            })),
        )])
        .await;
        let mut client = client_for(&server);

        let outcome = client
            .authenticate(&credentials(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            AuthOutcome::Unknown {
                raw_status: Some("MFA_REQUIRED".to_string())
            }
        );
    }

    #[tokio::test]
    async fn push_wait_token_is_not_requested_without_push() {
        let server = start_provider_mock(vec![authn_mock(
            ResponseTemplate::new(200).set_body_json(mfa_required_response(
                "state",
                &[("totp1", "token:software:totp")],
            )),
        )])
        .await;
        let mut client = client_for(&server);
        let cancel = CountingCancellation::default();

        client.authenticate(&credentials(), &cancel).await.unwrap();

        assert_eq!(cancel.requested.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn push_wait_token_is_requested_once_for_all_pushes() {
        let server = start_provider_mock(vec![
            authn_mock(ResponseTemplate::new(200).set_body_json(mfa_required_response(
                "state",
                &[("push1", "push"), ("push2", "push")],
            ))),
            Mock::given(method("POST"))
                .and(path("/api/v1/authn/factors/push1/verify"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(push_rejected_response("state")),
                ),
            Mock::given(method("POST"))
                .and(path("/api/v1/authn/factors/push2/verify"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(push_rejected_response("state")),
                ),
        ])
        .await;
        let mut client = client_for(&server);
        let cancel = CountingCancellation::default();

        client.authenticate(&credentials(), &cancel).await.unwrap();

        assert_eq!(cancel.requested.load(Ordering::SeqCst), 1);
    }
}
