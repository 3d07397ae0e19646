use std::{fmt, sync::LazyLock};

use base64::{Engine, engine::general_purpose::STANDARD};
use quick_xml::{Reader, events::Event};
use regex::Regex;
use tracing::debug;

use crate::{RoleEntry, SamlError};

/// Name of the SAML attribute listing the roles a user may assume.
pub const ROLE_ATTRIBUTE_NAME: &str = "https://aws.amazon.com/SAML/Attributes/Role";

/// Name of the hidden form field the provider posts the assertion in.
const FORM_FIELD: &str = "SAMLResponse";

static INPUT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("input tag pattern is valid"));

static TAG_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)[\s/]([a-z][a-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>`]+))"#)
        .expect("tag attribute pattern is valid")
});

/// A federation assertion, kept both in the base64 form the role-assumption service expects
/// and as the decoded XML document.
#[derive(Clone, PartialEq, Eq)]
pub struct SamlAssertion {
    encoded: String,
    xml: String,
}

impl SamlAssertion {
    /// Extracts the assertion from the HTML document served by an application embed link.
    pub fn from_html(html: &str) -> Result<Self, SamlError> {
        let value = form_field_value(html, FORM_FIELD).ok_or_else(|| {
            SamlError::invalid(format!("no `{FORM_FIELD}` form field in the provider response"))
        })?;

        let value = quick_xml::escape::unescape(&value)
            .map_err(|e| SamlError::invalid(format!("undecodable form field value: {e}")))?;

        Self::from_base64(&value)
    }

    /// Decodes a base64 encoded assertion. Whitespace inside the encoding is ignored.
    pub fn from_base64(encoded: &str) -> Result<Self, SamlError> {
        let encoded: String = encoded.split_whitespace().collect();
        if encoded.is_empty() {
            return Err(SamlError::invalid("empty assertion"));
        }

        let bytes = STANDARD
            .decode(&encoded)
            .map_err(|e| SamlError::invalid(format!("assertion is not valid base64: {e}")))?;
        let xml = String::from_utf8(bytes)
            .map_err(|e| SamlError::invalid(format!("assertion is not valid UTF-8: {e}")))?;

        Ok(Self { encoded, xml })
    }

    /// The assertion as base64, ready to hand to the role-assumption service.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Every role the assertion grants, in document order.
    ///
    /// Fails when the document is not well-formed XML, when a role value is malformed or when
    /// no role is granted at all.
    pub fn roles(&self) -> Result<Vec<RoleEntry>, SamlError> {
        let roles = role_values(&self.xml)?
            .iter()
            .map(|value| value.parse())
            .collect::<Result<Vec<RoleEntry>, _>>()?;

        if roles.is_empty() {
            return Err(SamlError::invalid("assertion does not grant any role"));
        }

        debug!(count = roles.len(), "Parsed roles from assertion");
        Ok(roles)
    }
}

impl fmt::Debug for SamlAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamlAssertion")
            .field("encoded_len", &self.encoded.len())
            .finish_non_exhaustive()
    }
}

/// Extracts the assertion from an embed-link HTML document and returns the roles it grants.
pub fn parse_roles(html: &str) -> Result<Vec<RoleEntry>, SamlError> {
    SamlAssertion::from_html(html)?.roles()
}

/// Value of the last `<input>` whose `name` attribute equals `name`.
fn form_field_value(html: &str, name: &str) -> Option<String> {
    INPUT_TAG
        .find_iter(html)
        .filter_map(|tag| {
            let tag = tag.as_str();
            let mut field_name = None;
            let mut field_value = None;

            for attr in TAG_ATTRIBUTE.captures_iter(tag) {
                let value = match attr.get(4) {
                    // `/` right before `>` closes the tag instead of ending the value.
                    Some(bare) if bare.end() + 1 == tag.len() => {
                        let bare = bare.as_str();
                        bare.strip_suffix('/').unwrap_or(bare)
                    }
                    Some(bare) => bare.as_str(),
                    None => attr
                        .get(2)
                        .or_else(|| attr.get(3))
                        .map_or("", |m| m.as_str()),
                };

                match attr[1].to_ascii_lowercase().as_str() {
                    "name" => field_name = Some(value),
                    "value" => field_value = Some(value),
                    _ => {}
                }
            }

            (field_name == Some(name)).then(|| field_value.unwrap_or_default().to_string())
        })
        .last()
}

/// Collects the text of every `AttributeValue` under the role attribute, checking that the
/// document is well-formed along the way.
fn role_values(xml: &str) -> Result<Vec<String>, SamlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let malformed =
        |position: u64, e: &dyn fmt::Display| SamlError::invalid(format!("malformed XML at {position}: {e}"));

    let mut values = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    // Depth of the role `Attribute` element while inside it.
    let mut role_attribute: Option<usize> = None;
    let mut current_value: Option<String> = None;

    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if depth == 0 && seen_root {
                    return Err(SamlError::invalid("multiple root elements"));
                }
                seen_root = true;
                depth += 1;

                match start.local_name().as_ref() {
                    b"Attribute" if role_attribute.is_none() => {
                        let name = start
                            .try_get_attribute("Name")
                            .map_err(|e| malformed(position, &e))?;
                        if let Some(name) = name {
                            let name = name.unescape_value().map_err(|e| malformed(position, &e))?;
                            if name == ROLE_ATTRIBUTE_NAME {
                                role_attribute = Some(depth);
                            }
                        }
                    }
                    b"AttributeValue" if role_attribute.is_some() => {
                        current_value = Some(String::new());
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(empty)) => {
                if depth == 0 {
                    if seen_root {
                        return Err(SamlError::invalid("multiple root elements"));
                    }
                    seen_root = true;
                }
                if role_attribute.is_some() && empty.local_name().as_ref() == b"AttributeValue" {
                    values.push(String::new());
                }
            }
            Ok(Event::Text(text)) => {
                if depth == 0 {
                    return Err(SamlError::invalid("text outside of the root element"));
                }
                if let Some(value) = current_value.as_mut() {
                    value.push_str(&text.unescape().map_err(|e| malformed(position, &e))?);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(value) = current_value.as_mut() {
                    let data = std::str::from_utf8(&data).map_err(|e| malformed(position, &e))?;
                    value.push_str(data);
                }
            }
            Ok(Event::End(end)) => {
                match end.local_name().as_ref() {
                    b"AttributeValue" => {
                        if let Some(value) = current_value.take() {
                            values.push(value.trim().to_string());
                        }
                    }
                    b"Attribute" if role_attribute == Some(depth) => role_attribute = None,
                    _ => {}
                }
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| SamlError::invalid("unbalanced closing tag"))?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(position, &e)),
        }
    }

    if !seen_root {
        return Err(SamlError::invalid("assertion is not an XML document"));
    }
    if depth != 0 {
        return Err(SamlError::invalid("assertion ends with unclosed elements"));
    }

    Ok(values)
}
