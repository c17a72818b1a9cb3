// src/handlers/ticket.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::ticket::{
        CreateTicketRequest, ReplyTicketRequest, STATUS_PENDING, STATUS_REPLIED, Ticket,
        TicketDetail, TicketReply,
    },
    utils::{html::clean_html, jwt::Claims},
};

const TICKET_COLUMNS: &str = "id, user_id, subject, body, status, created_at, updated_at";

async fn load_detail(pool: &PgPool, ticket: Ticket) -> Result<TicketDetail, AppError> {
    let replies = sqlx::query_as::<_, TicketReply>(
        r#"
        SELECT id, ticket_id, reply_body, admin_id, created_at
        FROM ticket_replies
        WHERE ticket_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(ticket.id)
    .fetch_all(pool)
    .await?;

    Ok(TicketDetail { ticket, replies })
}

/// Opens a support ticket for the current user.
pub async fn create_ticket(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    let user_id = claims.user_id()?;

    let ticket = sqlx::query_as::<_, Ticket>(&format!(
        "INSERT INTO tickets (user_id, subject, body, status) VALUES ($1, $2, $3, $4) RETURNING {TICKET_COLUMNS}"
    ))
    .bind(user_id)
    .bind(clean_html(&payload.subject))
    .bind(clean_html(&payload.body))
    .bind(STATUS_PENDING)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create ticket: {:?}", e);
        AppError::from(e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(TicketDetail {
            ticket,
            replies: Vec::new(),
        }),
    ))
}

/// Lists the current user's tickets, newest first.
pub async fn list_my_tickets(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let tickets = sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(tickets))
}

/// Shows a ticket with its replies. Users only see their own tickets.
pub async fn get_ticket(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let ticket = sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .filter(|t| t.user_id == user_id || claims.is_admin())
    .ok_or(AppError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(load_detail(&pool, ticket).await?))
}

/// Adds an admin reply and marks the ticket as replied.
/// Admin only.
pub async fn reply_ticket(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<ReplyTicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    let admin_id = claims.user_id()?;

    let mut tx = pool.begin().await?;

    let ticket = sqlx::query_as::<_, Ticket>(&format!(
        r#"
        UPDATE tickets SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {TICKET_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(STATUS_REPLIED)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("Ticket not found".to_string()))?;

    sqlx::query("INSERT INTO ticket_replies (ticket_id, reply_body, admin_id) VALUES ($1, $2, $3)")
        .bind(ticket.id)
        .bind(clean_html(&payload.reply_body))
        .bind(admin_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to reply to ticket: {:?}", e);
            AppError::from(e)
        })?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(load_detail(&pool, ticket).await?)))
}

/// Lists every ticket, pending ones first.
/// Admin only.
pub async fn list_all_tickets(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let tickets = sqlx::query_as::<_, Ticket>(&format!(
        r#"
        SELECT {TICKET_COLUMNS} FROM tickets
        ORDER BY (status = $1) DESC, created_at DESC, id DESC
        "#
    ))
    .bind(STATUS_PENDING)
    .fetch_all(&pool)
    .await?;

    Ok(Json(tickets))
}
