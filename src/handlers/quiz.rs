// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::response::{CorrectRespondersResponse, SubmitResponseRequest},
    services::{
        QuestionTarget, QuizError, questions,
        submission::{self, SubmissionOutcome},
    },
    store::QuizStore,
    utils::jwt::Claims,
};

/// Returns the active question with its choices, or `null` when none is active.
/// Choice correctness is never included.
pub async fn active_question(
    State(store): State<Arc<dyn QuizStore>>,
) -> Result<impl IntoResponse, AppError> {
    let question = questions::active_question(store.as_ref()).await?;
    Ok(Json(question))
}

/// Submits an answer to the active question.
pub async fn submit_response(
    State(store): State<Arc<dyn QuizStore>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitResponseRequest>,
) -> Result<impl IntoResponse, AppError> {
    submit(store, claims, QuestionTarget::Active, req).await
}

/// Submits an answer to a specific question.
pub async fn submit_response_for(
    State(store): State<Arc<dyn QuizStore>>,
    Extension(claims): Extension<Claims>,
    Path(question_id): Path<i64>,
    Json(req): Json<SubmitResponseRequest>,
) -> Result<impl IntoResponse, AppError> {
    submit(store, claims, QuestionTarget::Id(question_id), req).await
}

async fn submit(
    store: Arc<dyn QuizStore>,
    claims: Claims,
    target: QuestionTarget,
    req: SubmitResponseRequest,
) -> Result<(StatusCode, Json<SubmissionOutcome>), AppError> {
    let user_id = claims.user_id()?;
    let outcome =
        submission::submit(store.as_ref(), user_id, target, req.selected_choice_id).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Lists users who answered the active question correctly (empty when none is active).
pub async fn correct_responders(
    State(store): State<Arc<dyn QuizStore>>,
) -> Result<impl IntoResponse, AppError> {
    let correct_responders =
        questions::list_correct_responders(store.as_ref(), QuestionTarget::Active).await?;
    Ok(Json(CorrectRespondersResponse { correct_responders }))
}

/// Lists users who answered a specific question correctly.
pub async fn correct_responders_for(
    State(store): State<Arc<dyn QuizStore>>,
    Path(question_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let correct_responders =
        questions::list_correct_responders(store.as_ref(), QuestionTarget::Id(question_id))
            .await
            .map_err(|e| match e {
                QuizError::QuestionNotFound => AppError::NotFound(e.to_string()),
                other => other.into(),
            })?;
    Ok(Json(CorrectRespondersResponse { correct_responders }))
}
