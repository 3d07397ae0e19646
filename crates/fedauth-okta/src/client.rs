use std::fmt;

use tracing::{debug, info};

use crate::{
    ClientSettings, OktaError, api::AuthnApiResponse, error::require, transport::OktaTransport,
};

/// Client driving one login sequence against the identity provider.
///
/// The client owns the authenticated transport, so the provider session cookie survives between
/// the login, the multi-factor verification and the embed link fetch.
#[derive(Clone)]
pub struct OktaClient {
    pub(crate) settings: ClientSettings,
    pub(crate) transport: OktaTransport,
    /// Set by [`OktaClient::authenticate`] from the organization being logged into.
    pub(crate) base_url: Option<String>,
    pub(crate) session_token: Option<String>,
}

impl OktaClient {
    /// Creates a client. Nothing is sent until [`OktaClient::authenticate`] is called.
    pub fn new(settings: ClientSettings) -> Result<Self, OktaError> {
        let transport = OktaTransport::new(&settings)?;

        Ok(Self {
            settings,
            transport,
            base_url: None,
            session_token: None,
        })
    }

    /// The session token of the last successful login, if any.
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub(crate) fn base_url(&self) -> Result<&str, OktaError> {
        self.base_url.as_deref().ok_or(OktaError::NotAuthenticated)
    }

    pub(crate) fn api_url(&self, path: &str) -> Result<String, OktaError> {
        Ok(format!("{}/api/v1{path}", self.base_url()?))
    }

    /// Stores the session token of a successful response and returns it.
    pub(crate) fn store_session_token(
        &mut self,
        response: &AuthnApiResponse,
    ) -> Result<String, OktaError> {
        let session_token = require!(response.session_token.clone(), "sessionToken");

        match response.user_display_name() {
            Some(name) => info!("Successfully authenticated {name}"),
            None => info!("Successfully authenticated"),
        }
        debug!("Session token stored");

        self.session_token = Some(session_token.clone());
        Ok(session_token)
    }
}

impl fmt::Debug for OktaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OktaClient")
            .field("base_url", &self.base_url)
            .field("logged_in", &self.session_token.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_requires_a_login() {
        let client = OktaClient::new(ClientSettings::default()).unwrap();

        assert!(matches!(
            client.api_url("/authn"),
            Err(OktaError::NotAuthenticated)
        ));
        assert_eq!(client.session_token(), None);
    }

    #[test]
    fn store_session_token_requires_the_token() {
        let mut client = OktaClient::new(ClientSettings::default()).unwrap();
        let response: AuthnApiResponse =
            serde_json::from_str(r#"{ "status": "SUCCESS" }"#).unwrap();

        let result = client.store_session_token(&response);

        assert!(matches!(result, Err(OktaError::MissingField("sessionToken"))));
    }
}
