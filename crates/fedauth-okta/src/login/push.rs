use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use super::verify_path;
use crate::{
    OktaClient,
    OktaError,
    api::{AuthnApiResponse, VerifyFactorApiRequest},
    error::require,
};

/// How a push verification ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushVerification {
    /// The user approved the push and the session token was stored.
    Approved {
        #[allow(missing_docs)]
        session_token: String,
    },
    /// The user denied the push, or the provider reported no result.
    Rejected,
    /// The wait was cancelled before the user answered.
    Cancelled,
}

/// Hands out the token that abandons a push wait.
///
/// [`OktaClient::authenticate`] asks for it once, right before the first push is sent, so
/// whatever cancels it only applies from that point on.
pub trait PushCancellation: Send + Sync {
    /// Called as the push wait starts.
    fn push_wait_started(&self) -> CancellationToken;
}

impl PushCancellation for CancellationToken {
    fn push_wait_started(&self) -> CancellationToken {
        self.clone()
    }
}

impl OktaClient {
    /// Sends a push to the user and polls until it is answered.
    ///
    /// There is no limit on the number of polls, the loop ends when the provider reports a
    /// result or when `cancel` fires during the wait between two polls.
    #[instrument(skip(self, state_token, cancel))]
    pub async fn verify_push(
        &mut self,
        factor_id: &str,
        state_token: &str,
        cancel: &CancellationToken,
    ) -> Result<PushVerification, OktaError> {
        let request = VerifyFactorApiRequest {
            fid: factor_id,
            state_token,
            pass_code: None,
        };

        warn!("Push verification being sent...");
        let url = self.api_url(&verify_path(factor_id))?;
        let mut response = self.post_verify(&url, &request).await?;

        loop {
            if response.status.as_deref() == Some("SUCCESS") {
                let session_token = self.store_session_token(&response)?;
                return Ok(PushVerification::Approved { session_token });
            }

            if response.factor_result.as_deref().unwrap_or("REJECTED") == "REJECTED" {
                error!("Push verification rejected");
                return Ok(PushVerification::Rejected);
            }

            info!("Waiting for push verification...");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("Stopped waiting for push verification");
                    return Ok(PushVerification::Cancelled);
                }
                _ = tokio::time::sleep(self.settings.push_poll_interval) => {}
            }

            let next = require!(response.next_href(), "_links.next.href").to_owned();
            response = self.post_verify(&next, &request).await?;
        }
    }

    async fn post_verify(
        &self,
        url: &str,
        request: &VerifyFactorApiRequest<'_>,
    ) -> Result<AuthnApiResponse, OktaError> {
        self.transport
            .post_json(url, request)
            .await?
            .error_for_status()?
            .json()
    }
}
