use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identity provider client settings. They are uneditable once the client is created.
///
/// Defaults to
///
/// ```
/// # use std::time::Duration;
/// # use fedauth_okta::ClientSettings;
/// let settings = ClientSettings {
///     provider_domain: "okta.com".to_string(),
///     base_url: None,
///     user_agent: concat!("fedauth/", env!("CARGO_PKG_VERSION")).to_string(),
///     push_poll_interval: Duration::from_secs(1),
/// };
/// let default = ClientSettings::default();
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientSettings {
    /// Domain under which every organization has its own subdomain.
    pub provider_domain: String,
    /// Overrides the organization derived base url, e.g. for preview tenants.
    pub base_url: Option<String>,
    /// The user agent sent with every request.
    pub user_agent: String,
    /// Wait between two polls of a pending push verification.
    pub push_poll_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            provider_domain: "okta.com".into(),
            base_url: None,
            user_agent: concat!("fedauth/", env!("CARGO_PKG_VERSION")).into(),
            push_poll_interval: Duration::from_secs(1),
        }
    }
}

impl ClientSettings {
    /// Base url of `organization`, `https://{organization}.{provider_domain}` unless overridden.
    pub fn base_url_for(&self, organization: &str) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{organization}.{}", self.provider_domain),
        }
    }
}
