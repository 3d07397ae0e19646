use fedauth_aws::{AssertionSource, AwsError};
use fedauth_okta::{AppLink, OktaClient};
use fedauth_saml::SamlAssertion;

/// Redeems session tokens through the embed link of the AWS application.
#[derive(Debug)]
pub(crate) struct EmbedLinkSource {
    client: OktaClient,
    app: AppLink,
}

impl EmbedLinkSource {
    /// `client` must share the transport used to log in, the embed link needs its cookies.
    pub(crate) fn new(client: OktaClient, app: AppLink) -> Self {
        Self { client, app }
    }
}

#[async_trait::async_trait]
impl AssertionSource for EmbedLinkSource {
    async fn fetch_assertion(&self, session_token: &str) -> Result<SamlAssertion, AwsError> {
        self.client
            .fetch_assertion(&self.app, session_token)
            .await
            .map_err(|e| AwsError::AssertionSource(Box::new(e)))
    }
}
