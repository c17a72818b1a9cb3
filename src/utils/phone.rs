// src/utils/phone.rs

use std::sync::LazyLock;

use regex::Regex;

/// Digits only, optionally prefixed with '+', 10 to 15 digits long.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone regex is valid"));

pub fn is_valid_phone_number(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// `validator` hook for phone number fields.
pub fn validate_phone_number(phone: &str) -> Result<(), validator::ValidationError> {
    if is_valid_phone_number(phone) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_phone_number")
            .with_message("Phone number must contain 10 to 15 digits.".into()))
    }
}
