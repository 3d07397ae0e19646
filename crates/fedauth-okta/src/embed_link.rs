use fedauth_saml::SamlAssertion;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::{OktaClient, OktaError};

/// An application assigned to the user at the identity provider, addressed the way its embed
/// link is: `/home/{app_type}/{app_id}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppLink {
    /// Application type, `amazon_aws` for the cloud console app.
    pub app_type: String,
    /// Application instance id.
    pub app_id: String,
}

impl AppLink {
    #[allow(missing_docs)]
    pub fn new(app_type: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            app_type: app_type.into(),
            app_id: app_id.into(),
        }
    }
}

impl OktaClient {
    /// Redeems `session_token` through the embed link of `app` and extracts the federation
    /// assertion from the page it serves.
    ///
    /// The same token can be redeemed again later as long as this client, and with it the
    /// provider session cookie, is kept.
    #[instrument(skip(self, session_token))]
    pub async fn fetch_assertion(
        &self,
        app: &AppLink,
        session_token: &str,
    ) -> Result<SamlAssertion, OktaError> {
        let url = format!("{}/home/{}/{}", self.base_url()?, app.app_type, app.app_id);

        let response = self
            .transport
            .get(&url, &[("onetimetoken", session_token)])
            .await?;
        debug!(status = %response.status, "Embed link response received");

        if !response.status.is_success() {
            error!(status = %response.status, "Unable to fetch the federation assertion");
            return Err(response.into_error());
        }

        Ok(SamlAssertion::from_html(&response.body)?)
    }
}
