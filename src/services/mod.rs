// src/services/mod.rs

pub mod questions;
pub mod rotation;
pub mod submission;

use thiserror::Error;

use crate::store::StoreError;

/// Which question an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionTarget {
    /// Whatever question is active right now.
    Active,
    /// A specific question, active or not.
    Id(i64),
}

/// Rejections of quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("No question is currently active.")]
    NoActiveQuestion,

    #[error("Question not found.")]
    QuestionNotFound,

    #[error("You have already answered this question.")]
    AlreadyAnswered,

    #[error("Selected choice not found.")]
    ChoiceNotFound,

    #[error("The selected choice does not belong to this question.")]
    ChoiceMismatch,

    #[error("Your account no longer exists.")]
    UnknownUser,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QuizError {
    /// Machine-readable reason sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            QuizError::NoActiveQuestion => "no_active_question",
            QuizError::QuestionNotFound => "question_not_found",
            QuizError::AlreadyAnswered => "already_answered",
            QuizError::ChoiceNotFound => "choice_not_found",
            QuizError::ChoiceMismatch => "choice_mismatch",
            QuizError::UnknownUser => "unknown_user",
            QuizError::Store(_) => "internal",
        }
    }
}
