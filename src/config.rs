// src/config.rs

use std::env;
use std::time::Duration;

use dotenvy::dotenv;

use crate::services::rotation::ExpiryPolicy;

/// OTP codes are valid for five minutes unless overridden.
pub const DEFAULT_OTP_TTL_SECS: i64 = 300;

/// The rotation job runs once a minute unless overridden.
pub const DEFAULT_ROTATION_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: String,
    pub admin_phone: Option<String>,
    pub admin_password: Option<String>,
    pub otp_ttl_secs: i64,
    pub rotation_interval: Duration,
    pub expiry_policy: ExpiryPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = parse_or("JWT_EXPIRATION", 86_400);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let expiry_policy = expiry_policy_from(env::var("EXPIRED_QUESTION_POLICY").ok())
            .expect("EXPIRED_QUESTION_POLICY must be 'deactivate' or 'delete'");

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            admin_phone: env::var("ADMIN_PHONE").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            otp_ttl_secs: parse_or("OTP_TTL_SECS", DEFAULT_OTP_TTL_SECS),
            rotation_interval: Duration::from_secs(parse_or(
                "ROTATION_INTERVAL_SECS",
                DEFAULT_ROTATION_INTERVAL_SECS,
            )),
            expiry_policy,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Unset means the default policy; anything else must name a known policy.
fn expiry_policy_from(raw: Option<String>) -> Result<ExpiryPolicy, String> {
    match raw {
        Some(raw) => raw.parse(),
        None => Ok(ExpiryPolicy::default()),
    }
}
