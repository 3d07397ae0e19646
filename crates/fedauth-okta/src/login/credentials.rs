use std::fmt;

use crate::OktaError;

/// What the user logs in with.
#[derive(Clone)]
pub struct Credentials {
    /// Organization subdomain at the identity provider.
    pub organization: String,
    #[allow(missing_docs)]
    pub username: String,
    #[allow(missing_docs)]
    pub password: String,
}

impl Credentials {
    #[allow(missing_docs)]
    pub fn new(
        organization: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Fails with [`OktaError::EmptyInput`] when any field is empty.
    pub fn validate(&self) -> Result<(), OktaError> {
        if [&self.organization, &self.username, &self.password]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(OktaError::EmptyInput);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("organization", &self.organization)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}
