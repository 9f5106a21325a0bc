use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::FormData;

/// Identity under which a user's answers are persisted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque persistence for answered data, keyed by user identity.
pub trait AnswerStore: Send + Sync {
    fn load(&self, user: &UserId) -> Result<Option<FormData>, StoreError>;
    fn save(&self, user: &UserId, answers: &FormData) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no answers stored for this user")]
    NotFound,
    #[error("answer store unavailable: {0}")]
    Unavailable(String),
}
