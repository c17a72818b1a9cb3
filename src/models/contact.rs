// src/models/contact.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// The single row of the 'contact_info' table.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize, Validate)]
pub struct ContactInfo {
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    #[validate(length(max = 100))]
    pub telegram_id: Option<String>,
    #[validate(length(max = 100))]
    pub ita_id: Option<String>,
    #[validate(length(max = 100))]
    pub whatsapp_id: Option<String>,
    #[validate(length(max = 100))]
    pub instagram_id: Option<String>,
}
