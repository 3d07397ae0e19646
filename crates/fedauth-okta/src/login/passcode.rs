use reqwest::StatusCode;
use tracing::{error, instrument};

use super::verify_path;
use crate::{
    OktaClient,
    OktaError,
    api::{AuthnApiResponse, VerifyFactorApiRequest},
};

/// Length of the one-time passcodes the provider issues.
const PASSCODE_LENGTH: usize = 6;

impl OktaClient {
    /// Answers a [`PasscodeChallenge`](super::AuthOutcome::PasscodeChallenge).
    ///
    /// Returns `false` for a code that is not six characters long, without contacting the
    /// provider, and for a code the provider refused. On success the session token is stored.
    #[instrument(skip(self, state_token, passcode))]
    pub async fn verify_passcode(
        &mut self,
        factor_id: &str,
        state_token: &str,
        passcode: &str,
    ) -> Result<bool, OktaError> {
        if passcode.chars().count() != PASSCODE_LENGTH {
            error!("Passcodes must be {PASSCODE_LENGTH} digits");
            return Ok(false);
        }

        let request = VerifyFactorApiRequest {
            fid: factor_id,
            state_token,
            pass_code: Some(passcode),
        };
        let response = self
            .transport
            .post_json(&self.api_url(&verify_path(factor_id))?, &request)
            .await?;

        if response.status == StatusCode::FORBIDDEN {
            error!("Invalid passcode");
            return Ok(false);
        }

        let response: AuthnApiResponse = response.error_for_status()?.json()?;
        self.store_session_token(&response)?;
        Ok(true)
    }
}
