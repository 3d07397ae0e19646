use color_eyre::eyre::{Result, bail, eyre};
use fedauth_cli::passcode_prompt;
use fedauth_okta::{
    OktaClient,
    login::{AuthOutcome, Credentials},
};
use tracing::{error, info};

use crate::interrupt::Interrupts;

/// Logs in interactively and returns the session token.
pub(crate) async fn login(
    client: &mut OktaClient,
    credentials: &Credentials,
    interrupts: &Interrupts,
) -> Result<String> {
    let outcome = client.authenticate(credentials, interrupts).await;
    interrupts.disarm();

    match outcome? {
        AuthOutcome::Success { session_token } => Ok(session_token),
        AuthOutcome::PasscodeChallenge {
            factor_id,
            state_token,
        } => {
            info!("A one-time passcode is required");
            loop {
                let passcode = passcode_prompt()?;
                if client
                    .verify_passcode(&factor_id, &state_token, &passcode)
                    .await?
                {
                    break;
                }
                error!("Passcode not accepted, try again");
            }

            client
                .session_token()
                .map(str::to_owned)
                .ok_or_else(|| eyre!("Passcode accepted but no session token was stored"))
        }
        AuthOutcome::PushPending { .. } => {
            bail!("Push verification cancelled and no passcode factor is enrolled")
        }
        AuthOutcome::PushRejected { .. } => bail!("Push verification was rejected"),
        AuthOutcome::InvalidPassword => bail!("Invalid username or password"),
        AuthOutcome::EnrollmentRequired => {
            bail!(
                "User {} needs to enroll in multi-factor authentication first",
                credentials.username
            )
        }
        AuthOutcome::Unknown { raw_status } => bail!(
            "Unexpected login status: {}",
            raw_status.as_deref().unwrap_or("<none>")
        ),
    }
}
