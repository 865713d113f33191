use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::shared::constants::PROFILE_ROLES;

lazy_static! {
    /// Loose phone number check: digits with optional leading +, spaces, dashes, dots, parens
    /// - Valid: "+1 (555) 123-4567", "555.123.4567", "0812345678"
    /// - Invalid: "call me", "12", "+1-555-CALL"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9 ().-]{7,20}$").unwrap();

    /// US-style ZIP or ZIP+4, or a short alphanumeric postal code
    /// - Valid: "94107", "94107-1234", "SW1A 1AA"
    /// - Invalid: "", "94 107 12345 99", "zip!"
    pub static ref ZIP_CODE_REGEX: Regex =
        Regex::new(r"^(?:\d{5}(?:-\d{4})?|[A-Za-z0-9]{2,4} ?[A-Za-z0-9]{2,4})$").unwrap();
}

/// Rejects strings that are empty after trimming
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

pub fn valid_profile_role(value: &str) -> Result<(), ValidationError> {
    if PROFILE_ROLES.contains(&value) {
        return Ok(());
    }
    let mut err = ValidationError::new("role");
    err.message = Some(format!("role must be one of: {}", PROFILE_ROLES.join(", ")).into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+1 (555) 123-4567"));
        assert!(PHONE_REGEX.is_match("555.123.4567"));
        assert!(PHONE_REGEX.is_match("0812345678"));
        assert!(!PHONE_REGEX.is_match("call me"));
        assert!(!PHONE_REGEX.is_match("12"));
        assert!(!PHONE_REGEX.is_match("+1-555-CALL"));
    }

    #[test]
    fn test_zip_code_regex() {
        assert!(ZIP_CODE_REGEX.is_match("94107"));
        assert!(ZIP_CODE_REGEX.is_match("94107-1234"));
        assert!(ZIP_CODE_REGEX.is_match("SW1A 1AA"));
        assert!(!ZIP_CODE_REGEX.is_match(""));
        assert!(!ZIP_CODE_REGEX.is_match("zip!"));
        assert!(!ZIP_CODE_REGEX.is_match("94 107 12345 99"));
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Foundation pour").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_profile_role() {
        assert!(valid_profile_role("manager").is_ok());
        assert!(valid_profile_role("superuser").is_err());
    }
}
