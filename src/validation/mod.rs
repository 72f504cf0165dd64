use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// Accepts `local@domain.tld` shapes: no whitespace, exactly one `@`, and a
/// dot inside the domain with characters on both sides.
pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();
    let invalid = || ValidationError::new("email", "must look like local@domain.tld");

    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid());
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// Requires the literal `YYYY-MM-DD` shape first, then a real calendar date.
/// The two failures carry distinct messages so a caller can tell a malformed
/// string from an impossible date.
pub fn validate_birthdate(value: &str) -> Result<NaiveDate, ValidationError> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !shaped {
        return Err(ValidationError::new(
            "birthdate",
            "must use the YYYY-MM-DD format",
        ));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::new("birthdate", "is not a valid calendar date"))
}

pub fn validate_positive_int(field: &'static str, value: i64) -> ValidationResult {
    if value <= 0 {
        return Err(ValidationError::new(field, "must be a positive integer"));
    }

    Ok(())
}

pub fn validate_non_negative(field: &'static str, value: f64) -> ValidationResult {
    if value < 0.0 {
        return Err(ValidationError::new(field, "cannot be negative"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_email_shape() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("  a@b.co  ").is_ok());
        assert!(validate_email("first.last@shop.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("plainaddress").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@.co").is_err());
        assert!(validate_email("a@b.").is_err());
        assert!(validate_email("@b.co").is_err());
        assert!(validate_email("a@b@c.co").is_err());
        assert!(validate_email("a b@c.co").is_err());
    }

    #[test]
    fn validates_birthdate_shape_before_calendar() {
        assert_eq!(
            validate_birthdate("1990-04-12"),
            Ok(NaiveDate::from_ymd_opt(1990, 4, 12).expect("valid date"))
        );
        assert!(validate_birthdate("2025-02-28").is_ok());
        assert!(validate_birthdate("2024-02-29").is_ok());

        let shape_err = validate_birthdate("not-a-date").expect_err("shape must fail");
        assert_eq!(shape_err.message, "must use the YYYY-MM-DD format");
        assert!(validate_birthdate("1990-4-12").is_err());
        assert!(validate_birthdate("19900412").is_err());
        assert!(validate_birthdate("1990-04-12 ").is_err());

        let calendar_err = validate_birthdate("2025-02-30").expect_err("calendar must fail");
        assert_eq!(calendar_err.message, "is not a valid calendar date");
        assert!(validate_birthdate("2025-13-01").is_err());
        assert!(validate_birthdate("2023-02-29").is_err());
    }

    #[test]
    fn validates_positive_int() {
        assert!(validate_positive_int("qty", 1).is_ok());
        assert!(validate_positive_int("qty", 42).is_ok());
        assert!(validate_positive_int("qty", 0).is_err());
        assert!(validate_positive_int("qty", -3).is_err());
    }

    #[test]
    fn validates_non_negative_fee() {
        assert!(validate_non_negative("admin_fee", 0.0).is_ok());
        assert!(validate_non_negative("admin_fee", 5.5).is_ok());
        assert!(validate_non_negative("admin_fee", -0.01).is_err());
    }

    #[test]
    fn validation_error_display_includes_field() {
        let err = ValidationError::new("email", "must look like local@domain.tld");
        assert_eq!(err.to_string(), "email: must look like local@domain.tld");
    }
}
