use aws_config::{BehaviorVersion, Region};
use chrono::DateTime;
use tracing::{debug, info};

use crate::{AwsError, RoleAssumer, RoleAssumptionRequest, RoleCredentials, format_expiration};

/// [`RoleAssumer`] backed by the STS `AssumeRoleWithSAML` operation.
///
/// The operation is authorized by the assertion alone, so no local credentials are loaded.
#[derive(Debug, Clone)]
pub struct StsRoleAssumer {
    client: aws_sdk_sts::Client,
}

impl StsRoleAssumer {
    /// Creates an assumer talking to the STS endpoint of `region`.
    pub async fn new(region: impl Into<String>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .no_credentials()
            .load()
            .await;

        Self::from_client(aws_sdk_sts::Client::new(&config))
    }

    /// Wraps an already configured client.
    pub fn from_client(client: aws_sdk_sts::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl RoleAssumer for StsRoleAssumer {
    async fn assume_role_with_saml(
        &self,
        request: RoleAssumptionRequest<'_>,
    ) -> Result<RoleCredentials, AwsError> {
        info!("Calling AssumeRoleWithSAML");
        debug!(
            role_arn = request.role_arn,
            principal_arn = request.principal_arn,
            duration_seconds = request.duration_seconds,
            "Role assumption request"
        );

        let response = self
            .client
            .assume_role_with_saml()
            .role_arn(request.role_arn)
            .principal_arn(request.principal_arn)
            .saml_assertion(request.assertion)
            .set_duration_seconds(request.duration_seconds)
            .send()
            .await
            .map_err(|e| AwsError::RoleAssumption(Box::new(e.into_service_error())))?;

        let credentials = response.credentials().ok_or_else(|| {
            AwsError::RoleAssumption("AssumeRoleWithSAML returned no credentials".into())
        })?;

        let expiration = credentials.expiration();
        let expiration = DateTime::from_timestamp(expiration.secs(), expiration.subsec_nanos())
            .ok_or_else(|| {
                AwsError::RoleAssumption(
                    format!("expiration {expiration} is out of range").into(),
                )
            })?;

        Ok(RoleCredentials {
            access_key_id: credentials.access_key_id().to_owned(),
            secret_access_key: credentials.secret_access_key().to_owned(),
            session_token: credentials.session_token().to_owned(),
            expiration: format_expiration(&expiration),
        })
    }
}
