// src/services/submission.rs

use serde::Serialize;

use super::{QuestionTarget, QuizError};
use crate::{
    models::{question::Question, response::NewResponse},
    store::{QuizStore, StoreError},
};

/// Result of an accepted answer.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub message: String,
    pub is_correct: bool,
}

/// Resolves the question a request refers to.
pub async fn resolve_question(
    store: &dyn QuizStore,
    target: QuestionTarget,
) -> Result<Question, QuizError> {
    match target {
        QuestionTarget::Active => store
            .find_active_question()
            .await?
            .ok_or(QuizError::NoActiveQuestion),
        QuestionTarget::Id(id) => store
            .find_question(id)
            .await?
            .ok_or(QuizError::QuestionNotFound),
    }
}

/// Records a user's single answer to a question.
///
/// The checks run before the write so callers get a precise reason; the
/// store's own constraints still decide the race between two concurrent
/// submissions of the same user.
pub async fn submit(
    store: &dyn QuizStore,
    user_id: i64,
    target: QuestionTarget,
    selected_choice_id: i64,
) -> Result<SubmissionOutcome, QuizError> {
    let question = resolve_question(store, target).await?;

    if store.has_response(user_id, question.id).await? {
        return Err(QuizError::AlreadyAnswered);
    }

    let choice = store
        .find_choice(selected_choice_id)
        .await?
        .ok_or(QuizError::ChoiceNotFound)?;

    if choice.question_id != question.id {
        return Err(QuizError::ChoiceMismatch);
    }

    let recorded = match store
        .record_response(NewResponse {
            user_id,
            question_id: question.id,
            choice_id: choice.id,
            is_correct: choice.is_correct,
        })
        .await
    {
        Ok(recorded) => recorded,
        Err(StoreError::Duplicate) => return Err(QuizError::AlreadyAnswered),
        // Choice membership was checked above, so a broken reference here is
        // either the question vanishing mid-request or a deleted account.
        Err(StoreError::Integrity) => {
            return Err(match store.find_question(question.id).await? {
                None => QuizError::QuestionNotFound,
                Some(_) => QuizError::UnknownUser,
            });
        }
        Err(other) => return Err(other.into()),
    };

    tracing::info!(
        user_id,
        question_id = question.id,
        is_correct = recorded.is_correct,
        "Response recorded"
    );

    Ok(SubmissionOutcome {
        message: "Your answer has been recorded.".to_string(),
        is_correct: recorded.is_correct,
    })
}
