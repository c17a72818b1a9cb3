// src/store/mod.rs

//! Persistence for questions, choices, responses and correct responders.
//!
//! Both implementations enforce the same constraints themselves: one active
//! question at most, one response per (user, question), and a selected choice
//! that belongs to the answered question.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    question::{Choice, NewQuestion, Question},
    response::{NewResponse, ResponderProfile, UserResponse},
};

pub use memory::MemoryQuizStore;
pub use postgres::PgQuizStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate record")]
    Duplicate,

    /// A referenced row is missing or belongs elsewhere.
    #[error("referential integrity violated")]
    Integrity,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait QuizStore: Send + Sync {
    async fn find_question(&self, id: i64) -> Result<Option<Question>, StoreError>;

    async fn find_active_question(&self) -> Result<Option<Question>, StoreError>;

    /// All questions, earliest expiry first.
    async fn list_questions(&self) -> Result<Vec<Question>, StoreError>;

    async fn choices_for(&self, question_id: i64) -> Result<Vec<Choice>, StoreError>;

    async fn find_choice(&self, id: i64) -> Result<Option<Choice>, StoreError>;

    /// Inserts an inactive question and its choices in one unit.
    async fn create_question(&self, draft: NewQuestion) -> Result<Question, StoreError>;

    /// Deletes the question; choices, responses and responders cascade.
    async fn delete_question(&self, id: i64) -> Result<bool, StoreError>;

    /// Atomically deactivates every other question and activates `id`.
    /// Returns false if the question does not exist.
    async fn activate_exclusive(&self, id: i64) -> Result<bool, StoreError>;

    /// Activates `id` only while no question is active.
    async fn promote_if_idle(&self, id: i64) -> Result<bool, StoreError>;

    /// Deactivates active questions whose expiry is at or before `now`.
    async fn deactivate_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Deletes every question whose expiry is at or before `now`.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Inactive question with the earliest expiry strictly after `now`.
    async fn next_candidate(&self, now: DateTime<Utc>) -> Result<Option<Question>, StoreError>;

    async fn has_response(&self, user_id: i64, question_id: i64) -> Result<bool, StoreError>;

    /// Records the response and, when correct, the responder membership as one
    /// unit. Fails with `Duplicate` if the user already answered and with
    /// `Integrity` if the choice is not part of the question.
    async fn record_response(&self, response: NewResponse) -> Result<UserResponse, StoreError>;

    /// Idempotent membership add. Returns true only when the user was newly added.
    async fn ensure_correct_responder(
        &self,
        question_id: i64,
        user_id: i64,
    ) -> Result<bool, StoreError>;

    async fn correct_responders(
        &self,
        question_id: i64,
    ) -> Result<Vec<ResponderProfile>, StoreError>;
}
