// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::phone::validate_phone_number;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique phone number, the login identity.
    pub phone_number: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub first_name: String,
    pub last_name: String,
    pub province: String,

    /// 'M' or 'F'.
    pub gender: String,

    /// Staff users sign in with the 'admin' role.
    pub is_staff: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    pub fn role(&self) -> &'static str {
        if self.is_staff { "admin" } else { "user" }
    }
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(custom(function = validate_phone_number))]
    pub phone_number: String,
    #[validate(length(min = 1, max = 30, message = "First name is required (max 30 characters)."))]
    pub first_name: String,
    #[validate(length(min = 1, max = 30, message = "Last name is required (max 30 characters)."))]
    pub last_name: String,
    #[validate(length(min = 1, max = 50, message = "Province is required (max 50 characters)."))]
    pub province: String,
    #[validate(custom(function = validate_gender))]
    pub gender: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
    pub confirm_password: String,
}

/// DTO for user login. Fields are optional so missing ones map to 400, not 422.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone_number: Option<String>,
    pub password: Option<String>,
}

/// Token response for sign-up and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

fn validate_gender(gender: &str) -> Result<(), validator::ValidationError> {
    match gender {
        "M" | "F" => Ok(()),
        _ => Err(validator::ValidationError::new("gender_must_be_m_or_f")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(gender: &str) -> SignUpRequest {
        SignUpRequest {
            phone_number: "09121234567".to_string(),
            first_name: "Sara".to_string(),
            last_name: "Ahmadi".to_string(),
            province: "Tehran".to_string(),
            gender: gender.to_string(),
            password: "secret123".to_string(),
            confirm_password: "secret123".to_string(),
        }
    }

    #[test]
    fn sign_up_accepts_known_genders() {
        assert!(request("M").validate().is_ok());
        assert!(request("F").validate().is_ok());
    }

    #[test]
    fn sign_up_rejects_unknown_gender() {
        assert!(request("X").validate().is_err());
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            phone_number: "09121234567".to_string(),
            password: "$argon2id$...".to_string(),
            first_name: "Sara".to_string(),
            last_name: "Ahmadi".to_string(),
            province: "Tehran".to_string(),
            gender: "F".to_string(),
            is_staff: false,
            created_at: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(user.role(), "user");
    }
}
