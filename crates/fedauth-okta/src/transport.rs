use reqwest::{StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};

use crate::{ClientSettings, OktaError};

/// HTTP client shared by every call of a login sequence.
///
/// Its cookie jar holds the provider's durable session cookie, which is what allows a session
/// token to be redeemed through an embed link more than once.
#[derive(Clone, Debug)]
pub(crate) struct OktaTransport {
    client: reqwest::Client,
}

/// Status and body of a provider response, read before deciding whether it is an error.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, OktaError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Converts a non-2xx response into [`OktaError::UnknownError`].
    pub fn error_for_status(self) -> Result<Self, OktaError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(self.into_error())
        }
    }

    pub fn into_error(self) -> OktaError {
        OktaError::UnknownError {
            status: self.status,
            body: self.body,
        }
    }
}

impl OktaTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, OktaError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }

    pub async fn post_json(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<RawResponse, OktaError> {
        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        Self::read(response).await
    }

    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<RawResponse, OktaError> {
        let response = self.client.get(url).query(query).send().await?;

        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> Result<RawResponse, OktaError> {
        let status = response.status();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
