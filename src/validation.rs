//! Pure field validators for untrusted input.
//!
//! Every function here is value-in, result-out: no I/O, no state, no
//! allocation beyond the returned value. The schema walk in
//! [`crate::schema`] composes these per field.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use strum::VariantNames;
use uuid::Uuid;

use crate::error::Violation;
use crate::models::users::UserRole;

/// Characters that never appear in an accepted address.
const ILLEGAL_EMAIL_CHARS: [char; 12] = [
    '<', '>', '(', ')', '[', ']', '\\', ',', ';', ':', '"', ' ',
];

/// Validates email format: local-part `@` domain, domain with at least
/// one dot, no illegal characters.
///
/// # Arguments
/// * `email` - The email address to validate
///
/// # Returns
/// * `Ok(())` if the address is well-formed
/// * `Err(Violation::InvalidEmailFormat)` otherwise
pub fn validate_email(email: &str) -> Result<(), Violation> {
    if email.is_empty() || email.len() > 254 {
        return Err(Violation::InvalidEmailFormat);
    }

    // Exactly one @, not at either end.
    let mut parts = email.split('@');
    let (local_part, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(Violation::InvalidEmailFormat),
    };

    if local_part.is_empty() || local_part.len() > 64 {
        return Err(Violation::InvalidEmailFormat);
    }

    if domain.is_empty() || domain.len() > 253 {
        return Err(Violation::InvalidEmailFormat);
    }

    // The domain needs at least one dot, and dots never run together.
    if !domain.contains('.') || email.contains("..") {
        return Err(Violation::InvalidEmailFormat);
    }

    if email
        .chars()
        .any(|c| ILLEGAL_EMAIL_CHARS.contains(&c) || c.is_whitespace() || c.is_control())
    {
        return Err(Violation::InvalidEmailFormat);
    }

    Ok(())
}

/// Validates that a string holds at least `min` characters.
///
/// Length is counted in characters, not bytes.
pub fn validate_min_length(value: &str, min: usize) -> Result<(), Violation> {
    if value.chars().count() < min {
        return Err(Violation::TooShort { min });
    }

    Ok(())
}

/// Parses a role value by exact, case-sensitive membership.
pub fn parse_role(value: &str) -> Result<UserRole, Violation> {
    UserRole::from_str(value).map_err(|_| Violation::InvalidEnumMember {
        permitted: UserRole::VARIANTS,
    })
}

/// Parses a UUID field.
///
/// # Arguments
/// * `value` - The raw string to parse
///
/// # Returns
/// * `Ok(uuid::Uuid)` if valid
/// * `Err(Violation::InvalidUuid)` otherwise
pub fn parse_uuid(value: &str) -> Result<Uuid, Violation> {
    Uuid::parse_str(value).map_err(|_| Violation::InvalidUuid)
}

/// Parses a timestamp field.
///
/// Accepts RFC 3339, or the offset-less `YYYY-MM-DDTHH:MM:SS[.ffffff]`
/// form the upstream API emits; offset-less values are read as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, Violation> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    Err(Violation::InvalidTimestamp)
}

/// Reads an integer field, honoring the boundary coercions callers rely
/// on: JSON integers, integral floats, and strings of digits all pass.
pub fn parse_integer(value: &Value) -> Result<i64, Violation> {
    match value {
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                return Ok(integer);
            }
            match number.as_f64() {
                Some(float)
                    if float.fract() == 0.0
                        && float >= i64::MIN as f64
                        && float <= i64::MAX as f64 =>
                {
                    Ok(float as i64)
                }
                _ => Err(Violation::NotAnInteger),
            }
        }
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| Violation::NotAnInteger),
        _ => Err(Violation::NotAnInteger),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("test.email+tag@domain.co.uk").is_ok());
        assert!(validate_email("user_name@sub.domain.com").is_ok());
        assert!(validate_email("john.doe@example.com").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("").is_err());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("@domain.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@@domain.com").is_err());
        assert!(validate_email("user@domain").is_err());
        assert!(validate_email("user name@domain.com").is_err());
        assert!(validate_email("user@domain..com").is_err());
        assert!(validate_email("user<x>@domain.com").is_err());
    }

    #[test]
    fn test_validate_min_length_boundary() {
        assert!(validate_min_length("123456", 6).is_ok(), "Exactly 6 should pass");
        assert!(validate_min_length("12345", 6).is_err());
        assert_eq!(
            validate_min_length("123", 6),
            Err(Violation::TooShort { min: 6 })
        );
    }

    #[test]
    fn test_validate_min_length_counts_characters() {
        // Six characters, more than six bytes.
        assert!(validate_min_length("señora", 6).is_ok());
    }

    #[test]
    fn test_parse_role_exact_match() {
        assert_eq!(parse_role("ADMIN"), Ok(UserRole::Admin));
        assert_eq!(parse_role("USER"), Ok(UserRole::User));
        assert_eq!(parse_role("AUTHENTICATED"), Ok(UserRole::Authenticated));
    }

    #[test]
    fn test_parse_role_rejects_unknown_and_cased() {
        assert!(parse_role("INVALID_ROLE").is_err());
        assert!(parse_role("admin").is_err(), "Membership is case-sensitive");
        assert!(parse_role("").is_err());
    }

    #[test]
    fn test_parse_uuid() {
        assert!(parse_uuid("123e4567-e89b-12d3-a456-426614174000").is_ok());
        assert!(parse_uuid("not-a-uuid").is_err());
        assert!(parse_uuid("").is_err());
    }

    #[test]
    fn test_parse_timestamp_forms() {
        assert!(parse_timestamp("2024-01-01T00:00:00Z").is_ok());
        assert!(parse_timestamp("2024-01-01T12:00:00+02:00").is_ok());
        assert!(parse_timestamp("2024-01-01T00:00:00").is_ok(), "Offset-less form is accepted");
        assert!(parse_timestamp("2024-01-01T00:00:00.123456").is_ok());
        assert!(parse_timestamp("January 1st").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_parse_integer_coercions() {
        assert_eq!(parse_integer(&json!(42)), Ok(42));
        assert_eq!(parse_integer(&json!(42.0)), Ok(42));
        assert_eq!(parse_integer(&json!("42")), Ok(42));
        assert!(parse_integer(&json!(42.5)).is_err());
        assert!(parse_integer(&json!("forty-two")).is_err());
        assert!(parse_integer(&json!(true)).is_err());
        assert!(parse_integer(&json!(null)).is_err());
    }
}
