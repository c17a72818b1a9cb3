// src/store/memory.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{QuizStore, StoreError};
use crate::models::{
    question::{Choice, NewQuestion, Question},
    response::{NewResponse, ResponderProfile, UserResponse},
};

/// In-process store with the same constraints as the Postgres schema.
///
/// Every operation runs under one lock, which makes each of them atomic.
#[derive(Default)]
pub struct MemoryQuizStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    last_id: i64,
    questions: BTreeMap<i64, Question>,
    choices: BTreeMap<i64, Choice>,
    responses: Vec<UserResponse>,
    /// (question_id, user_id) in insertion order.
    responders: Vec<(i64, i64)>,
    users: BTreeMap<i64, ResponderProfile>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn active_id(&self) -> Option<i64> {
        self.questions.values().find(|q| q.is_active).map(|q| q.id)
    }

    fn remove_question(&mut self, id: i64) -> bool {
        if self.questions.remove(&id).is_none() {
            return false;
        }
        self.choices.retain(|_, c| c.question_id != id);
        self.responses.retain(|r| r.question_id != id);
        self.responders.retain(|(q, _)| *q != id);
        true
    }

    fn add_responder(&mut self, question_id: i64, user_id: i64) -> Result<bool, StoreError> {
        if !self.questions.contains_key(&question_id) || !self.users.contains_key(&user_id) {
            return Err(StoreError::Integrity);
        }
        if self.responders.contains(&(question_id, user_id)) {
            return Ok(false);
        }
        self.responders.push((question_id, user_id));
        Ok(true)
    }
}

impl MemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user so responses and responder listings can refer to it.
    /// Returns the assigned user id.
    pub async fn add_user(
        &self,
        phone_number: &str,
        first_name: &str,
        last_name: &str,
        province: &str,
        gender: &str,
    ) -> i64 {
        let mut tables = self.tables.lock().await;
        let user_id = tables.next_id();
        tables.users.insert(
            user_id,
            ResponderProfile {
                user_id,
                phone_number: phone_number.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                province: province.to_string(),
                gender: gender.to_string(),
            },
        );
        user_id
    }

    /// Number of recorded responses, for inspection in tests and local runs.
    pub async fn response_count(&self) -> usize {
        self.tables.lock().await.responses.len()
    }
}

#[async_trait]
impl QuizStore for MemoryQuizStore {
    async fn find_question(&self, id: i64) -> Result<Option<Question>, StoreError> {
        Ok(self.tables.lock().await.questions.get(&id).cloned())
    }

    async fn find_active_question(&self) -> Result<Option<Question>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .active_id()
            .and_then(|id| tables.questions.get(&id).cloned()))
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StoreError> {
        let tables = self.tables.lock().await;
        let mut questions: Vec<Question> = tables.questions.values().cloned().collect();
        questions.sort_by_key(|q| (q.expiry_date, q.id));
        Ok(questions)
    }

    async fn choices_for(&self, question_id: i64) -> Result<Vec<Choice>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .choices
            .values()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn find_choice(&self, id: i64) -> Result<Option<Choice>, StoreError> {
        Ok(self.tables.lock().await.choices.get(&id).cloned())
    }

    async fn create_question(&self, draft: NewQuestion) -> Result<Question, StoreError> {
        let mut tables = self.tables.lock().await;
        let question = Question {
            id: tables.next_id(),
            text: draft.text,
            expiry_date: draft.expiry_date,
            is_active: false,
        };
        tables.questions.insert(question.id, question.clone());

        for choice in draft.choices {
            let id = tables.next_id();
            tables.choices.insert(
                id,
                Choice {
                    id,
                    question_id: question.id,
                    text: choice.text,
                    is_correct: choice.is_correct,
                },
            );
        }

        Ok(question)
    }

    async fn delete_question(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.lock().await.remove_question(id))
    }

    async fn activate_exclusive(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.questions.contains_key(&id) {
            return Ok(false);
        }
        for question in tables.questions.values_mut() {
            question.is_active = question.id == id;
        }
        Ok(true)
    }

    async fn promote_if_idle(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.active_id().is_some() {
            return Ok(false);
        }
        match tables.questions.get_mut(&id) {
            Some(question) => {
                question.is_active = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn deactivate_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        let mut count = 0;
        for question in tables.questions.values_mut() {
            if question.is_active && question.expiry_date <= now {
                question.is_active = false;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        let expired: Vec<i64> = tables
            .questions
            .values()
            .filter(|q| q.expiry_date <= now)
            .map(|q| q.id)
            .collect();
        for id in &expired {
            tables.remove_question(*id);
        }
        Ok(expired.len() as u64)
    }

    async fn next_candidate(&self, now: DateTime<Utc>) -> Result<Option<Question>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .questions
            .values()
            .filter(|q| !q.is_active && q.expiry_date > now)
            .min_by_key(|q| (q.expiry_date, q.id))
            .cloned())
    }

    async fn has_response(&self, user_id: i64, question_id: i64) -> Result<bool, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .responses
            .iter()
            .any(|r| r.user_id == user_id && r.question_id == question_id))
    }

    async fn record_response(&self, response: NewResponse) -> Result<UserResponse, StoreError> {
        let mut tables = self.tables.lock().await;

        if tables
            .responses
            .iter()
            .any(|r| r.user_id == response.user_id && r.question_id == response.question_id)
        {
            return Err(StoreError::Duplicate);
        }

        let choice_matches = tables
            .choices
            .get(&response.choice_id)
            .is_some_and(|c| c.question_id == response.question_id);
        if !choice_matches || !tables.users.contains_key(&response.user_id) {
            return Err(StoreError::Integrity);
        }

        if response.is_correct {
            tables.add_responder(response.question_id, response.user_id)?;
        }

        let recorded = UserResponse {
            id: tables.next_id(),
            user_id: response.user_id,
            question_id: response.question_id,
            choice_id: response.choice_id,
            is_correct: response.is_correct,
            created_at: Utc::now(),
        };
        tables.responses.push(recorded.clone());
        Ok(recorded)
    }

    async fn ensure_correct_responder(
        &self,
        question_id: i64,
        user_id: i64,
    ) -> Result<bool, StoreError> {
        self.tables.lock().await.add_responder(question_id, user_id)
    }

    async fn correct_responders(
        &self,
        question_id: i64,
    ) -> Result<Vec<ResponderProfile>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .responders
            .iter()
            .filter(|(q, _)| *q == question_id)
            .filter_map(|(_, user_id)| tables.users.get(user_id).cloned())
            .collect())
    }
}
