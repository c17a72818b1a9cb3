// src/services/rotation.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::store::{QuizStore, StoreError};

/// What happens to a question once its expiry passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryPolicy {
    /// Keep the question, responses and responders; only clear the active flag.
    #[default]
    Deactivate,
    /// Remove expired questions together with their choices and responses.
    Delete,
}

impl FromStr for ExpiryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deactivate" => Ok(ExpiryPolicy::Deactivate),
            "delete" => Ok(ExpiryPolicy::Delete),
            other => Err(format!("unknown expiry policy '{other}'")),
        }
    }
}

/// What a single tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationReport {
    /// Questions deactivated or deleted because they expired.
    pub expired: u64,
    /// Question promoted to active, if any.
    pub activated: Option<i64>,
}

/// Retires expired questions and, if nothing is active afterwards, promotes
/// the not-yet-expired question that expires first.
pub async fn tick(
    store: &dyn QuizStore,
    now: DateTime<Utc>,
    policy: ExpiryPolicy,
) -> Result<RotationReport, StoreError> {
    let expired = match policy {
        ExpiryPolicy::Deactivate => store.deactivate_expired(now).await?,
        ExpiryPolicy::Delete => store.delete_expired(now).await?,
    };

    let mut report = RotationReport {
        expired,
        activated: None,
    };

    if store.find_active_question().await?.is_some() {
        return Ok(report);
    }

    if let Some(next) = store.next_candidate(now).await? {
        if store.promote_if_idle(next.id).await? {
            report.activated = Some(next.id);
        }
    }

    Ok(report)
}
