// src/utils/otp.rs

use rand::Rng;

pub const CODE_LENGTH: usize = 6;

/// Generates a random 6-digit code without a leading zero.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Where issued codes go. Real SMS delivery is out of scope; the default sender logs.
pub trait OtpSender: Send + Sync {
    fn deliver(&self, phone_number: &str, code: &str);
}

#[derive(Debug, Clone, Default)]
pub struct LogOtpSender;

impl OtpSender for LogOtpSender {
    fn deliver(&self, phone_number: &str, code: &str) {
        tracing::info!(phone = %phone_number, code = %code, "OTP issued");
    }
}
