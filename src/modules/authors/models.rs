use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::not_blank;

/// A persisted author. `id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: Option<i64>,
    pub name: String,
}

/// Request body for creating or renaming an author.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthorDraft {
    #[serde(default)]
    #[garde(custom(not_blank))]
    pub name: String,
}

impl From<AuthorDraft> for Author {
    fn from(draft: AuthorDraft) -> Self {
        Self {
            id: None,
            name: draft.name,
        }
    }
}
