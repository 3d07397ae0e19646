use thiserror::Error;

/// Errors raised while extracting or parsing a federation assertion.
#[derive(Debug, Error)]
pub enum SamlError {
    /// The assertion is missing, undecodable, malformed or grants no role. The message
    /// describes which.
    #[error("Invalid SAML assertion: {0}")]
    InvalidSaml(String),
}

impl SamlError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidSaml(message.into())
    }
}

/// Errors raised while choosing a role.
#[derive(Debug, Error)]
pub enum RoleSelectionError {
    /// There was nothing to choose from.
    #[error("No roles available to select from")]
    NoRoles,

    /// The prompt capability failed, e.g. the terminal was closed or the user aborted.
    #[error("Role prompt failed: {0}")]
    Prompt(String),
}
