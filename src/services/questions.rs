// src/services/questions.rs

use super::{QuestionTarget, QuizError, submission::resolve_question};
use crate::{
    models::{
        question::{CreateQuestionRequest, NewChoice, NewQuestion, QuestionDetail, QuestionView},
        response::ResponderProfile,
    },
    store::QuizStore,
    utils::html::clean_html,
};

/// The active question with its choices, or `None` when nothing is active.
pub async fn active_question(store: &dyn QuizStore) -> Result<Option<QuestionView>, QuizError> {
    let Some(question) = store.find_active_question().await? else {
        return Ok(None);
    };
    let choices = store.choices_for(question.id).await?;
    Ok(Some(QuestionView::new(question, choices)))
}

/// Users who answered the target question correctly.
///
/// With no active question the active variant yields an empty list; an unknown
/// question id is `QuestionNotFound`.
pub async fn list_correct_responders(
    store: &dyn QuizStore,
    target: QuestionTarget,
) -> Result<Vec<ResponderProfile>, QuizError> {
    let question = match resolve_question(store, target).await {
        Ok(question) => question,
        Err(QuizError::NoActiveQuestion) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    Ok(store.correct_responders(question.id).await?)
}

pub async fn list_questions(store: &dyn QuizStore) -> Result<Vec<QuestionDetail>, QuizError> {
    let mut details = Vec::new();
    for question in store.list_questions().await? {
        let choices = store.choices_for(question.id).await?;
        details.push(QuestionDetail { question, choices });
    }
    Ok(details)
}

/// Stores a new, inactive question. Text is sanitized before it is stored.
pub async fn create_question(
    store: &dyn QuizStore,
    req: CreateQuestionRequest,
) -> Result<QuestionDetail, QuizError> {
    let draft = NewQuestion {
        text: clean_html(&req.text),
        expiry_date: req.expiry_date,
        choices: req
            .choices
            .into_iter()
            .map(|c| NewChoice {
                text: clean_html(&c.text),
                is_correct: c.is_correct,
            })
            .collect(),
    };

    let question = store.create_question(draft).await?;
    let choices = store.choices_for(question.id).await?;
    tracing::info!(question_id = question.id, "Question created");
    Ok(QuestionDetail { question, choices })
}

/// Makes `id` the only active question.
pub async fn activate(store: &dyn QuizStore, id: i64) -> Result<(), QuizError> {
    if !store.activate_exclusive(id).await? {
        return Err(QuizError::QuestionNotFound);
    }
    tracing::info!(question_id = id, "Question activated");
    Ok(())
}

pub async fn delete(store: &dyn QuizStore, id: i64) -> Result<(), QuizError> {
    if !store.delete_question(id).await? {
        return Err(QuizError::QuestionNotFound);
    }
    tracing::info!(question_id = id, "Question deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryQuizStore;
    use chrono::{Duration, Utc};

    fn request(text: &str, hours: i64) -> CreateQuestionRequest {
        CreateQuestionRequest {
            text: text.to_string(),
            expiry_date: Utc::now() + Duration::hours(hours),
            choices: vec![
                NewChoice { text: "yes".to_string(), is_correct: true },
                NewChoice { text: "no".to_string(), is_correct: false },
            ],
        }
    }

    #[tokio::test]
    async fn activation_is_exclusive() {
        let store = MemoryQuizStore::new();
        let first = create_question(&store, request("first", 1)).await.unwrap();
        let second = create_question(&store, request("second", 2)).await.unwrap();

        activate(&store, first.question.id).await.unwrap();
        activate(&store, second.question.id).await.unwrap();

        let active: Vec<_> = store
            .list_questions()
            .await
            .unwrap()
            .into_iter()
            .filter(|q| q.is_active)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.question.id);
    }

    #[tokio::test]
    async fn activating_unknown_question_fails() {
        let store = MemoryQuizStore::new();
        assert!(matches!(
            activate(&store, 42).await,
            Err(QuizError::QuestionNotFound)
        ));
    }

    #[tokio::test]
    async fn created_question_text_is_sanitized() {
        let store = MemoryQuizStore::new();
        let detail = create_question(&store, request("Why?<script>x()</script>", 1))
            .await
            .unwrap();
        assert_eq!(detail.question.text, "Why?");
        assert!(!detail.question.is_active);
        assert_eq!(detail.choices.len(), 2);
    }

    #[tokio::test]
    async fn responders_of_nothing_active_is_empty() {
        let store = MemoryQuizStore::new();
        let listed = list_correct_responders(&store, QuestionTarget::Active)
            .await
            .unwrap();
        assert!(listed.is_empty());

        assert!(matches!(
            list_correct_responders(&store, QuestionTarget::Id(3)).await,
            Err(QuizError::QuestionNotFound)
        ));
    }
}
