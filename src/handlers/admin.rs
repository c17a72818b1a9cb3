// src/handlers/admin.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::question::CreateQuestionRequest,
    services::{QuizError, questions, rotation},
    store::QuizStore,
};

fn not_found(e: QuizError) -> AppError {
    match e {
        QuizError::QuestionNotFound => AppError::NotFound("Question not found".to_string()),
        other => other.into(),
    }
}

/// Lists all questions with their choices, correctness included.
/// Admin only.
pub async fn list_questions(
    State(store): State<Arc<dyn QuizStore>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(questions::list_questions(store.as_ref()).await?))
}

/// Creates a new, inactive question with its choices.
/// Admin only.
pub async fn create_question(
    State(store): State<Arc<dyn QuizStore>>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let detail = questions::create_question(store.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Deletes a question by ID, with its choices and responses.
/// Admin only.
pub async fn delete_question(
    State(store): State<Arc<dyn QuizStore>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    questions::delete(store.as_ref(), id)
        .await
        .map_err(not_found)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Makes the question the only active one.
/// Admin only.
pub async fn activate_question(
    State(store): State<Arc<dyn QuizStore>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    questions::activate(store.as_ref(), id)
        .await
        .map_err(not_found)?;
    Ok(Json(json!({ "id": id, "is_active": true })))
}

/// Runs one rotation tick immediately instead of waiting for the scheduler.
/// Admin only.
pub async fn rotate_now(
    State(store): State<Arc<dyn QuizStore>>,
    State(config): State<Config>,
) -> Result<impl IntoResponse, AppError> {
    let report = rotation::tick(store.as_ref(), Utc::now(), config.expiry_policy).await?;
    Ok(Json(json!({
        "expired": report.expired,
        "activated": report.activated,
    })))
}
