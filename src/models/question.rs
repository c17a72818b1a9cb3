// src/models/question.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// Free-form question text.
    pub text: String,

    /// Once this passes, the rotation job retires the question.
    pub expiry_date: DateTime<Utc>,

    /// At most one question is active at any moment.
    pub is_active: bool,
}

/// Represents the 'choices' table in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
}

/// Choice as shown to players (correctness hidden).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicChoice {
    pub id: i64,
    pub text: String,
}

impl From<Choice> for PublicChoice {
    fn from(choice: Choice) -> Self {
        Self {
            id: choice.id,
            text: choice.text,
        }
    }
}

/// DTO for the active question endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: i64,
    pub text: String,
    pub expiry_date: DateTime<Utc>,
    pub is_active: bool,
    pub choices: Vec<PublicChoice>,
}

impl QuestionView {
    pub fn new(question: Question, choices: Vec<Choice>) -> Self {
        Self {
            id: question.id,
            text: question.text,
            expiry_date: question.expiry_date,
            is_active: question.is_active,
            choices: choices.into_iter().map(PublicChoice::from).collect(),
        }
    }
}

/// Admin view of a question, correctness included.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: Question,
    pub choices: Vec<Choice>,
}

/// A question ready to be written to the store.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub text: String,
    pub expiry_date: DateTime<Utc>,
    pub choices: Vec<NewChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChoice {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
    pub expiry_date: DateTime<Utc>,
    #[validate(custom(function = validate_choices))]
    pub choices: Vec<NewChoice>,
}

fn validate_choices(choices: &[NewChoice]) -> Result<(), validator::ValidationError> {
    if choices.len() < 2 {
        return Err(validator::ValidationError::new("at_least_two_choices"));
    }
    if choices.iter().any(|c| c.text.trim().is_empty() || c.text.chars().count() > 200) {
        return Err(validator::ValidationError::new("invalid_choice_text"));
    }
    if !choices.iter().any(|c| c.is_correct) {
        return Err(validator::ValidationError::new("no_correct_choice"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(text: &str, is_correct: bool) -> NewChoice {
        NewChoice {
            text: text.to_string(),
            is_correct,
        }
    }

    #[test]
    fn create_request_needs_a_correct_choice() {
        let req = CreateQuestionRequest {
            text: "Capital of France?".to_string(),
            expiry_date: Utc::now(),
            choices: vec![choice("Lyon", false), choice("Nice", false)],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_request_needs_two_choices() {
        let req = CreateQuestionRequest {
            text: "Capital of France?".to_string(),
            expiry_date: Utc::now(),
            choices: vec![choice("Paris", true)],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_request_accepts_well_formed_question() {
        let req = CreateQuestionRequest {
            text: "Capital of France?".to_string(),
            expiry_date: Utc::now(),
            choices: vec![choice("Paris", true), choice("Lyon", false)],
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn question_view_hides_correctness() {
        let question = Question {
            id: 1,
            text: "Q".to_string(),
            expiry_date: Utc::now(),
            is_active: true,
        };
        let choices = vec![Choice {
            id: 7,
            question_id: 1,
            text: "A".to_string(),
            is_correct: true,
        }];
        let json = serde_json::to_value(QuestionView::new(question, choices)).unwrap();
        assert!(json["choices"][0].get("is_correct").is_none());
        assert_eq!(json["choices"][0]["id"], 7);
    }
}
