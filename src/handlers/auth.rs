// src/handlers/auth.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, is_unique_violation},
    models::{
        otp::{PhoneOtp, SendOtpRequest, VerifyOtpRequest},
        user::{AuthResponse, LoginRequest, SignUpRequest, User},
    },
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
        otp::{OtpSender, generate_code},
    },
};

const USER_COLUMNS: &str =
    "id, phone_number, password, first_name, last_name, province, gender, is_staff, created_at";

async fn phone_registered(pool: &PgPool, phone_number: &str) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM users WHERE phone_number = $1)",
    )
    .bind(phone_number)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Issues a one-time code for an unregistered phone number.
///
/// A new request replaces any earlier code for the same number.
pub async fn send_otp(
    State(pool): State<PgPool>,
    State(sender): State<Arc<dyn OtpSender>>,
    Json(payload): Json<SendOtpRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if phone_registered(&pool, &payload.phone_number).await? {
        return Err(AppError::Conflict(
            "This phone number is already registered.".to_string(),
        ));
    }

    let code = generate_code();

    sqlx::query(
        r#"
        INSERT INTO phone_otps (phone_number, code, created_at, is_verified)
        VALUES ($1, $2, NOW(), FALSE)
        ON CONFLICT (phone_number) DO UPDATE SET
            code = EXCLUDED.code,
            created_at = EXCLUDED.created_at,
            is_verified = FALSE
        "#,
    )
    .bind(&payload.phone_number)
    .bind(&code)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to store OTP: {:?}", e);
        AppError::from(e)
    })?;

    sender.deliver(&payload.phone_number, &code);

    Ok(Json(json!({ "message": "Verification code sent." })))
}

/// Checks a code against the latest one issued for the phone number.
pub async fn verify_otp(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let entry = sqlx::query_as::<_, PhoneOtp>(
        "SELECT phone_number, code, created_at, is_verified FROM phone_otps WHERE phone_number = $1",
    )
    .bind(&payload.phone_number)
    .fetch_optional(&pool)
    .await?;

    let entry = match entry {
        Some(entry) if entry.code == payload.otp => entry,
        _ => {
            return Err(AppError::BadRequest(
                "The verification code is incorrect.".to_string(),
            ));
        }
    };

    if entry.is_expired(Utc::now(), config.otp_ttl_secs) {
        return Err(AppError::BadRequest(
            "The verification code has expired.".to_string(),
        ));
    }

    sqlx::query("UPDATE phone_otps SET is_verified = TRUE WHERE phone_number = $1")
        .bind(&entry.phone_number)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "Phone number verified." })))
}

/// Registers a new user whose phone number passed OTP verification.
///
/// Hashes the password using Argon2 before storing it and consumes the
/// verification record. Returns 201 Created with the user and a token.
pub async fn sign_up(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if payload.password != payload.confirm_password {
        return Err(AppError::BadRequest(
            "Password and confirmation do not match.".to_string(),
        ));
    }

    let verified = sqlx::query_scalar::<_, bool>(
        "SELECT is_verified FROM phone_otps WHERE phone_number = $1",
    )
    .bind(&payload.phone_number)
    .fetch_optional(&pool)
    .await?
    .unwrap_or(false);

    if !verified {
        return Err(AppError::BadRequest(
            "Phone number has not been verified.".to_string(),
        ));
    }

    let hashed_password = hash_password(&payload.password)?;

    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (phone_number, password, first_name, last_name, province, gender)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&payload.phone_number)
    .bind(&hashed_password)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.province)
    .bind(&payload.gender)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!(
                "Phone number '{}' is already registered",
                payload.phone_number
            ))
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    sqlx::query("DELETE FROM phone_otps WHERE phone_number = $1")
        .bind(&payload.phone_number)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let token = sign_jwt(user.id, user.role(), &config.jwt_secret, config.jwt_expiration)?;
    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Authenticates a user by phone number and password and returns a JWT.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(phone_number), Some(password)) = (payload.phone_number, payload.password) else {
        return Err(AppError::BadRequest(
            "Phone number and password are required.".to_string(),
        ));
    };

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE phone_number = $1"
    ))
    .bind(&phone_number)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::from(e)
    })?
    .ok_or_else(|| AppError::AuthError("Invalid phone number or password".to_string()))?;

    if !verify_password(&password, &user.password)? {
        return Err(AppError::AuthError(
            "Invalid phone number or password".to_string(),
        ));
    }

    let token = sign_jwt(user.id, user.role(), &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(AuthResponse { user, token }))
}

/// Creates the staff account from configuration if it does not exist yet.
pub async fn seed_admin_user(pool: &PgPool, config: &Config) -> Result<(), AppError> {
    let (Some(phone_number), Some(password)) = (&config.admin_phone, &config.admin_password) else {
        return Ok(());
    };

    if phone_registered(pool, phone_number).await? {
        return Ok(());
    }

    tracing::info!("Seeding admin user: {}", phone_number);
    let hashed_password = hash_password(password)?;

    sqlx::query(
        r#"
        INSERT INTO users (phone_number, password, first_name, last_name, province, gender, is_staff)
        VALUES ($1, $2, 'Admin', 'Admin', '-', 'M', TRUE)
        "#,
    )
    .bind(phone_number)
    .bind(hashed_password)
    .execute(pool)
    .await?;

    tracing::info!("Admin user created successfully.");
    Ok(())
}
