//! Canned identity provider documents.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};

/// SAML attribute carrying the role/principal pairs.
pub const ROLE_ATTRIBUTE: &str = "https://aws.amazon.com/SAML/Attributes/Role";

/// A role ARN for account `123456789012`.
pub fn role_arn(name: &str) -> String {
    format!("arn:aws:iam::123456789012:role/{name}")
}

/// The SAML provider ARN used by every canned assertion.
pub fn principal_arn() -> String {
    "arn:aws:iam::123456789012:saml-provider/okta".to_string()
}

/// Builds a SAML response document granting the given roles.
pub fn assertion_xml(role_names: &[&str]) -> String {
    let values: String = role_names
        .iter()
        .map(|name| {
            format!(
                r#"<saml2:AttributeValue xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="xs:string">{},{}</saml2:AttributeValue>"#,
                role_arn(name),
                principal_arn()
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<saml2p:Response xmlns:saml2p="urn:oasis:names:tc:SAML:2.0:protocol" Destination="https://signin.aws.amazon.com/saml" ID="id1" Version="2.0">
  <saml2:Issuer xmlns:saml2="urn:oasis:names:tc:SAML:2.0:assertion">http://www.okta.com/exk1</saml2:Issuer>
  <saml2:Assertion xmlns:saml2="urn:oasis:names:tc:SAML:2.0:assertion" ID="id2" Version="2.0">
    <saml2:AttributeStatement>
      <saml2:Attribute Name="https://aws.amazon.com/SAML/Attributes/RoleSessionName" NameFormat="urn:oasis:names:tc:SAML:2.0:attrname-format:uri">
        <saml2:AttributeValue xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="xs:string">user@example.com</saml2:AttributeValue>
      </saml2:Attribute>
      <saml2:Attribute Name="{ROLE_ATTRIBUTE}" NameFormat="urn:oasis:names:tc:SAML:2.0:attrname-format:uri">
        {values}
      </saml2:Attribute>
    </saml2:AttributeStatement>
  </saml2:Assertion>
</saml2p:Response>"#
    )
}

/// Wraps an assertion document into the auto-submitting form the provider serves from an
/// application embed link. The value is entity-escaped the way the provider escapes it.
pub fn embed_link_html(xml: &str) -> String {
    let encoded = STANDARD
        .encode(xml)
        .replace('+', "&#x2b;")
        .replace('=', "&#x3d;");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>Signing in...</title></head>
<body id="app" onload="document.forms[0].submit()">
<form id="appForm" action="https://signin.aws.amazon.com/saml" method="POST">
<input name="SAMLResponse" type="hidden" value="{encoded}"/>
<input name="RelayState" type="hidden" value=""/>
</form>
</body>
</html>"#
    )
}

/// Login response embedding the user profile.
fn user_embedded() -> Value {
    json!({
        "user": {
            "id": "00ub0oNGTSWTBKOLGLNR",
            "profile": {
                "login": "user@example.com",
                "firstName": "Isaac",
                "lastName": "Brock"
            }
        }
    })
}

/// `status=SUCCESS` response carrying a session token.
pub fn success_response(session_token: &str) -> Value {
    json!({
        "expiresAt": "2015-11-03T10:15:57.000Z",
        "status": "SUCCESS",
        "sessionToken": session_token,
        "_embedded": user_embedded()
    })
}

/// `status=MFA_REQUIRED` response offering the given `(id, factorType)` factors.
pub fn mfa_required_response(state_token: &str, factors: &[(&str, &str)]) -> Value {
    let factors: Vec<Value> = factors
        .iter()
        .map(|(id, factor_type)| {
            json!({
                "id": id,
                "factorType": factor_type,
                "provider": "OKTA"
            })
        })
        .collect();

    json!({
        "stateToken": state_token,
        "expiresAt": "2015-11-03T10:15:57.000Z",
        "status": "MFA_REQUIRED",
        "_embedded": {
            "user": user_embedded()["user"],
            "factors": factors
        }
    })
}

/// Login response with an arbitrary status and nothing else.
pub fn status_response(status: &str) -> Value {
    json!({
        "stateToken": "state-token",
        "status": status
    })
}

/// Push challenge still waiting for the user, pointing at the next poll link.
pub fn push_waiting_response(state_token: &str, next_href: &str) -> Value {
    json!({
        "stateToken": state_token,
        "status": "MFA_CHALLENGE",
        "factorResult": "WAITING",
        "_links": {
            "next": {
                "name": "poll",
                "href": next_href,
                "hints": { "allow": ["POST"] }
            }
        }
    })
}

/// Push challenge denied by the user.
pub fn push_rejected_response(state_token: &str) -> Value {
    json!({
        "stateToken": state_token,
        "status": "MFA_CHALLENGE",
        "factorResult": "REJECTED"
    })
}
