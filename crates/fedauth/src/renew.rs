use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, eyre};
use fedauth_aws::{
    AssumedSession, CredentialsFile, ExpirationEntry, ExpirationRecord, FederatedSession,
    FederationCredential, Profile, format_expiration, write_profiles,
};
use fedauth_okta::{OktaClient, login::Credentials};
use fedauth_saml::RoleEntry;
use tracing::{debug, info, warn};

use crate::{interrupt::Interrupts, login::login};

/// How often a running re-up checks the session.
pub(crate) const CHECK_INTERVAL: Duration = Duration::from_secs(60);

const OUTPUT: &str = "json";

/// Where the credentials of an assumed role go.
pub(crate) struct Destination {
    pub profile: String,
    pub region: String,
    pub credentials: CredentialsFile,
    pub expiration: ExpirationRecord,
}

impl Destination {
    pub(crate) fn write(&self, session: &AssumedSession) -> Result<()> {
        write_profiles(
            &self.credentials,
            &self.profile,
            &Profile {
                region: &self.region,
                output: OUTPUT,
                session,
            },
        )
        .wrap_err_with(|| format!("writing {}", self.credentials.path().display()))?;

        match self.expiration.read() {
            Ok(Some(previous)) => debug!(
                "Replacing expiration {} of profile \"{}\"",
                format_expiration(&previous.expiration_time),
                previous.profile
            ),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Unreadable expiration record, overwriting it"),
        }
        self.expiration.write(&ExpirationEntry {
            profile: self.profile.clone(),
            region: self.region.clone(),
            output: OUTPUT.to_string(),
            expiration_time: session.expiration,
        })?;
        Ok(())
    }
}

/// Obtains a new session token once the identity provider stops honoring the current one.
#[async_trait::async_trait(?Send)]
pub(crate) trait Relogin {
    async fn login(&mut self) -> Result<String>;
}

/// Logs the user in again at the terminal.
pub(crate) struct InteractiveLogin {
    pub client: OktaClient,
    pub credentials: Credentials,
    pub interrupts: Interrupts,
}

#[async_trait::async_trait(?Send)]
impl Relogin for InteractiveLogin {
    async fn login(&mut self) -> Result<String> {
        login(&mut self.client, &self.credentials, &self.interrupts).await
    }
}

/// What a single re-up check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Check {
    /// More than the renewal buffer was left, nothing was touched.
    NotDue,
    /// Renewed by redeeming the current session token.
    Renewed,
    /// The session token was no longer honored, renewed after logging in again.
    LoggedInAgain,
}

/// Keeps one role assumed across re-up checks.
pub(crate) struct Renewal<L> {
    pub session: FederatedSession,
    pub role: RoleEntry,
    pub session_token: String,
    pub relogin: L,
    pub destination: Destination,
}

impl<L: Relogin> Renewal<L> {
    /// Renews the session when it is within the renewal buffer and writes the new credentials.
    pub(crate) async fn check(&mut self) -> Result<Check> {
        let window = self
            .session
            .current()
            .ok_or_else(|| eyre!("No session to renew"))?
            .validity();
        if !window.needs_renewal() {
            debug!(
                remaining_seconds = window.remaining().num_seconds(),
                "Session still valid"
            );
            return Ok(Check::NotDue);
        }

        if window.is_valid() {
            info!("Session is about to expire, renewing");
        } else {
            warn!("Session has expired, renewing");
        }
        let mut check = Check::Renewed;
        let credential = self.credential();
        let renewal = self
            .session
            .assume(&self.role, &credential)
            .await
            .map(|_| ());
        if let Err(e) = renewal {
            warn!(error = %e, "Unable to renew with the current login, logging in again");
            self.session_token = self.relogin.login().await?;
            let credential = self.credential();
            self.session.assume(&self.role, &credential).await?;
            check = Check::LoggedInAgain;
        }

        let renewed = self
            .session
            .current()
            .ok_or_else(|| eyre!("Renewal left no session"))?;
        self.destination.write(renewed)?;
        Ok(check)
    }

    fn credential(&self) -> FederationCredential {
        FederationCredential::SessionToken(self.session_token.clone())
    }
}

/// Keeps the role assumed, checking every `interval`. Only returns on error.
pub(crate) async fn reup<L: Relogin>(mut renewal: Renewal<L>, interval: Duration) -> Result<()> {
    info!("Keeping the credentials fresh, press Ctrl-C to stop");

    loop {
        tokio::time::sleep(interval).await;
        renewal.check().await?;
    }
}
