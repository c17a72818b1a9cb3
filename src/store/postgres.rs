// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use super::{QuizStore, StoreError};
use crate::models::{
    question::{Choice, NewQuestion, Question},
    response::{NewResponse, ResponderProfile, UserResponse},
};

/// Advisory lock serializing every write that changes which question is active.
const ACTIVATION_LOCK_KEY: i64 = 0x5155_495a; // "QUIZ"

const QUESTION_COLUMNS: &str = "id, text, expiry_date, is_active";

#[derive(Clone)]
pub struct PgQuizStore {
    pool: PgPool,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn lock_activation(tx: &mut Transaction<'_, Postgres>) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ACTIVATION_LOCK_KEY)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

/// Translates constraint violations into their store-level meaning.
fn map_write_error(err: sqlx::Error) -> StoreError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => StoreError::Duplicate,
        Some(db) if db.is_foreign_key_violation() => StoreError::Integrity,
        _ => StoreError::Database(err),
    }
}

/// Adds a user to a question's correct responders inside or outside a transaction.
/// Returns false when the user was already listed.
async fn insert_correct_responder<'e, E>(
    executor: E,
    question_id: i64,
    user_id: i64,
) -> Result<bool, StoreError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO question_correct_responders (question_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(question_id)
    .bind(user_id)
    .execute(executor)
    .await
    .map_err(map_write_error)?;

    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn find_question(&self, id: i64) -> Result<Option<Question>, StoreError> {
        let question = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn find_active_question(&self) -> Result<Option<Question>, StoreError> {
        let question = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE is_active LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StoreError> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY expiry_date, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn choices_for(&self, question_id: i64) -> Result<Vec<Choice>, StoreError> {
        let choices = sqlx::query_as::<_, Choice>(
            "SELECT id, question_id, text, is_correct FROM choices WHERE question_id = $1 ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(choices)
    }

    async fn find_choice(&self, id: i64) -> Result<Option<Choice>, StoreError> {
        let choice = sqlx::query_as::<_, Choice>(
            "SELECT id, question_id, text, is_correct FROM choices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(choice)
    }

    async fn create_question(&self, draft: NewQuestion) -> Result<Question, StoreError> {
        let mut tx = self.pool.begin().await?;

        let question = sqlx::query_as::<_, Question>(&format!(
            "INSERT INTO questions (text, expiry_date) VALUES ($1, $2) RETURNING {QUESTION_COLUMNS}"
        ))
        .bind(&draft.text)
        .bind(draft.expiry_date)
        .fetch_one(&mut *tx)
        .await?;

        for choice in &draft.choices {
            sqlx::query("INSERT INTO choices (question_id, text, is_correct) VALUES ($1, $2, $3)")
                .bind(question.id)
                .bind(&choice.text)
                .bind(choice.is_correct)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(question)
    }

    async fn delete_question(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn activate_exclusive(&self, id: i64) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_activation(&mut tx).await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM questions WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE questions SET is_active = FALSE WHERE is_active AND id <> $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE questions SET is_active = TRUE WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(true)
    }

    async fn promote_if_idle(&self, id: i64) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_activation(&mut tx).await?;

        let result = sqlx::query(
            r#"
            UPDATE questions SET is_active = TRUE
            WHERE id = $1 AND NOT EXISTS (SELECT 1 FROM questions WHERE is_active)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(done) => {
                tx.commit().await?;
                Ok(done.rows_affected() > 0)
            }
            Err(e) => match map_write_error(e) {
                // Another writer won the single-active slot.
                StoreError::Duplicate => Ok(false),
                other => Err(other),
            },
        }
    }

    async fn deactivate_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result =
            sqlx::query("UPDATE questions SET is_active = FALSE WHERE is_active AND expiry_date <= $1")
                .bind(now)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM questions WHERE expiry_date <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn next_candidate(&self, now: DateTime<Utc>) -> Result<Option<Question>, StoreError> {
        let question = sqlx::query_as::<_, Question>(&format!(
            r#"
            SELECT {QUESTION_COLUMNS} FROM questions
            WHERE NOT is_active AND expiry_date > $1
            ORDER BY expiry_date, id
            LIMIT 1
            "#
        ))
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn has_response(&self, user_id: i64, question_id: i64) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_responses WHERE user_id = $1 AND question_id = $2)",
        )
        .bind(user_id)
        .bind(question_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn record_response(&self, response: NewResponse) -> Result<UserResponse, StoreError> {
        let mut tx = self.pool.begin().await?;

        let recorded = sqlx::query_as::<_, UserResponse>(
            r#"
            INSERT INTO user_responses (user_id, question_id, choice_id, is_correct)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, question_id, choice_id, is_correct, created_at
            "#,
        )
        .bind(response.user_id)
        .bind(response.question_id)
        .bind(response.choice_id)
        .bind(response.is_correct)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        if recorded.is_correct {
            insert_correct_responder(&mut *tx, recorded.question_id, recorded.user_id).await?;
        }

        tx.commit().await?;
        Ok(recorded)
    }

    async fn ensure_correct_responder(
        &self,
        question_id: i64,
        user_id: i64,
    ) -> Result<bool, StoreError> {
        insert_correct_responder(&self.pool, question_id, user_id).await
    }

    async fn correct_responders(
        &self,
        question_id: i64,
    ) -> Result<Vec<ResponderProfile>, StoreError> {
        let responders = sqlx::query_as::<_, ResponderProfile>(
            r#"
            SELECT
                u.id AS user_id,
                u.phone_number,
                u.first_name,
                u.last_name,
                u.province,
                u.gender
            FROM question_correct_responders r
            JOIN users u ON u.id = r.user_id
            WHERE r.question_id = $1
            ORDER BY r.added_at, u.id
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(responders)
    }
}
