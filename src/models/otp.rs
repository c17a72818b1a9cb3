// src/models/otp.rs

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

use crate::utils::phone::validate_phone_number;

/// Represents the 'phone_otps' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct PhoneOtp {
    pub phone_number: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub is_verified: bool,
}

impl PhoneOtp {
    /// A code is usable for `ttl_secs` after it was issued.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl_secs: i64) -> bool {
        now > self.created_at + Duration::seconds(ttl_secs)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendOtpRequest {
    #[validate(custom(function = validate_phone_number))]
    pub phone_number: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(custom(function = validate_phone_number))]
    pub phone_number: String,
    #[validate(length(equal = 6, message = "The code has 6 digits."))]
    pub otp: String,
}
