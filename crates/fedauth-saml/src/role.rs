use std::{fmt, str::FromStr};

use crate::SamlError;

/// A role the assertion authorizes, paired with the identity provider principal that vouches
/// for it. Both are needed to exchange the assertion for credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleEntry {
    /// ARN of the role to assume, e.g. `arn:aws:iam::123456789012:role/Admin`.
    pub role_arn: String,
    /// ARN of the SAML provider, e.g. `arn:aws:iam::123456789012:saml-provider/okta`.
    pub principal_arn: String,
}

impl RoleEntry {
    /// Creates a new entry.
    pub fn new(role_arn: impl Into<String>, principal_arn: impl Into<String>) -> Self {
        Self {
            role_arn: role_arn.into(),
            principal_arn: principal_arn.into(),
        }
    }

    /// The role name: everything after the last `/` of the role ARN, so role paths are dropped.
    pub fn role_name(&self) -> &str {
        self.role_arn
            .rsplit_once('/')
            .map_or(self.role_arn.as_str(), |(_, name)| name)
    }
}

impl fmt::Display for RoleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.role_arn)
    }
}

/// Parses a role attribute value: a role ARN and a provider ARN separated by a comma, in
/// either order.
impl FromStr for RoleEntry {
    type Err = SamlError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();

        let role = parts.iter().find(|p| p.contains(":role/"));
        let principal = parts.iter().find(|p| p.contains(":saml-provider/"));

        match (role, principal) {
            (Some(role), Some(principal)) if parts.len() == 2 => {
                Ok(RoleEntry::new(*role, *principal))
            }
            _ => Err(SamlError::invalid(format!(
                "malformed role attribute value `{value}`"
            ))),
        }
    }
}
