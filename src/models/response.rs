// src/models/response.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'user_responses' table in the database.
/// One row per (user, question); rows are never edited.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
    pub choice_id: i64,
    pub is_correct: bool,
    pub created_at: DateTime<Utc>,
}

/// A response that passed validation and is about to be recorded.
#[derive(Debug, Clone, Copy)]
pub struct NewResponse {
    pub user_id: i64,
    pub question_id: i64,
    pub choice_id: i64,
    pub is_correct: bool,
}

/// DTO for submitting an answer.
#[derive(Debug, Deserialize)]
pub struct SubmitResponseRequest {
    pub selected_choice_id: i64,
}

/// Public profile of a user who answered correctly.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ResponderProfile {
    #[serde(skip)]
    pub user_id: i64,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub province: String,
    /// Stored code, `M` or `F`.
    pub gender: String,
}

#[derive(Debug, Serialize)]
pub struct CorrectRespondersResponse {
    pub correct_responders: Vec<ResponderProfile>,
}
