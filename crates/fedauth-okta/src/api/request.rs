use serde::Serialize;

/// Body of `POST /api/v1/authn`.
#[derive(Serialize)]
pub(crate) struct AuthnApiRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST /api/v1/authn/factors/{fid}/verify`, also re-sent when polling a push.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyFactorApiRequest<'a> {
    pub fid: &'a str,
    pub state_token: &'a str,
    /// Absent when triggering or polling a push verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_code: Option<&'a str>,
}
