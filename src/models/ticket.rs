// src/models/ticket.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_REPLIED: &str = "replied";

/// Represents the 'tickets' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub subject: String,
    pub body: String,
    /// 'pending' until an admin replies, then 'replied'.
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents the 'ticket_replies' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TicketReply {
    pub id: i64,
    #[serde(skip_serializing)]
    pub ticket_id: i64,
    pub reply_body: String,
    /// Null once the replying admin account is removed.
    pub admin_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Ticket together with its replies, oldest first.
#[derive(Debug, Serialize)]
pub struct TicketDetail {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub replies: Vec<TicketReply>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketRequest {
    #[validate(length(min = 1, max = 255))]
    pub subject: String,
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReplyTicketRequest {
    #[validate(length(min = 1, max = 10000))]
    pub reply_body: String,
}
