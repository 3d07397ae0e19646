use chrono::{DateTime, NaiveDateTime, Utc};

use crate::AwsError;

/// The one format expirations are exchanged in, always UTC.
pub const EXPIRATION_FORMAT: &str = "%Y-%m-%d %H:%M:%S+00:00";

/// Parses an expiration as reported by the role-assumption service.
///
/// There is no fallback format, anything else is an [`AwsError::InvalidExpiration`].
pub fn parse_expiration(value: &str) -> Result<DateTime<Utc>, AwsError> {
    NaiveDateTime::parse_from_str(value, EXPIRATION_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| AwsError::InvalidExpiration {
            value: value.to_owned(),
            source,
        })
}

/// Formats `expiration` in [`EXPIRATION_FORMAT`].
pub fn format_expiration(expiration: &DateTime<Utc>) -> String {
    expiration.format(EXPIRATION_FORMAT).to_string()
}

/// `#[serde(with)]` adapter storing a timestamp in [`EXPIRATION_FORMAT`].
pub(crate) mod wire_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub(crate) fn serialize<S: Serializer>(
        expiration: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_expiration(expiration))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_expiration(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_the_wire_format() {
        let expiration = parse_expiration("2024-03-01 12:11:00+00:00").unwrap();

        assert_eq!(
            expiration,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 11, 0).unwrap()
        );
        assert_eq!(format_expiration(&expiration), "2024-03-01 12:11:00+00:00");
    }

    #[test]
    fn other_formats_are_rejected() {
        for value in [
            "2024-03-01T12:11:00Z",
            "2024-03-01 12:11:00",
            "2024-03-01 12:11:00+02:00",
            "",
        ] {
            assert!(
                matches!(parse_expiration(value), Err(AwsError::InvalidExpiration { .. })),
                "{value} should be rejected"
            );
        }
    }
}
