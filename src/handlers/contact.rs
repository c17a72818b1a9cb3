// src/handlers/contact.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::{error::AppError, models::contact::ContactInfo};

/// Returns the contact details, or `null` before an admin has set them.
pub async fn get_contact_info(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let info = sqlx::query_as::<_, ContactInfo>(
        r#"
        SELECT address, phone_number, telegram_id, ita_id, whatsapp_id, instagram_id
        FROM contact_info
        WHERE id = 1
        "#,
    )
    .fetch_optional(&pool)
    .await?;

    Ok(Json(info))
}

/// Replaces the contact details. There is only ever one row.
/// Admin only.
pub async fn put_contact_info(
    State(pool): State<PgPool>,
    Json(payload): Json<ContactInfo>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let info = sqlx::query_as::<_, ContactInfo>(
        r#"
        INSERT INTO contact_info (id, address, phone_number, telegram_id, ita_id, whatsapp_id, instagram_id)
        VALUES (1, $1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE SET
            address = EXCLUDED.address,
            phone_number = EXCLUDED.phone_number,
            telegram_id = EXCLUDED.telegram_id,
            ita_id = EXCLUDED.ita_id,
            whatsapp_id = EXCLUDED.whatsapp_id,
            instagram_id = EXCLUDED.instagram_id
        RETURNING address, phone_number, telegram_id, ita_id, whatsapp_id, instagram_id
        "#,
    )
    .bind(&payload.address)
    .bind(&payload.phone_number)
    .bind(&payload.telegram_id)
    .bind(&payload.ita_id)
    .bind(&payload.whatsapp_id)
    .bind(&payload.instagram_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to save contact info: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(info))
}
