use serde::Deserialize;

/// Shared shape of the authentication and factor verification responses. Every field is
/// optional, which ones are present depends on `status`.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthnApiResponse {
    pub status: Option<String>,
    pub state_token: Option<String>,
    pub session_token: Option<String>,
    pub factor_result: Option<String>,
    #[serde(rename = "_embedded")]
    pub embedded: Option<EmbeddedApiResponse>,
    #[serde(rename = "_links")]
    pub links: Option<LinksApiResponse>,
}

impl AuthnApiResponse {
    pub fn factors(&self) -> &[Factor] {
        self.embedded
            .as_ref()
            .map_or(&[], |embedded| embedded.factors.as_slice())
    }

    pub fn next_href(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.next.as_ref())
            .map(|next| next.href.as_str())
    }

    /// `"First Last"` of the authenticated user, when the provider embedded the profile.
    pub fn user_display_name(&self) -> Option<String> {
        let profile = self.embedded.as_ref()?.user.as_ref()?.profile.as_ref()?;
        match (&profile.first_name, &profile.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.clone()),
            (None, None) => None,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct EmbeddedApiResponse {
    #[serde(default)]
    pub factors: Vec<Factor>,
    pub user: Option<UserApiResponse>,
}

#[derive(Deserialize)]
pub(crate) struct UserApiResponse {
    pub profile: Option<ProfileApiResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfileApiResponse {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct LinksApiResponse {
    pub next: Option<LinkApiResponse>,
}

#[derive(Deserialize)]
pub(crate) struct LinkApiResponse {
    pub href: String,
}

/// A multi-factor verification method offered in a login challenge.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Factor {
    /// Factor id, used in the verify endpoint path.
    pub id: String,
    /// Kind of factor.
    pub factor_type: FactorType,
}

/// The factor kinds the login state machine knows how to drive.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorType {
    /// Push notification to the provider's authenticator app.
    #[serde(rename = "push")]
    Push,
    /// Time-based one-time passcode.
    #[serde(rename = "token:software:totp")]
    Totp,
    /// Any other factor, ignored.
    #[serde(other)]
    Other,
}
