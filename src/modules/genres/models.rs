use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::not_blank;

/// A persisted genre. `id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: Option<i64>,
    pub name: String,
}

/// Request body for creating or renaming an genre.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenreDraft {
    #[serde(default)]
    #[garde(custom(not_blank))]
    pub name: String,
}

impl From<GenreDraft> for Genre {
    fn from(draft: GenreDraft) -> Self {
        Self {
            id: None,
            name: draft.name,
        }
    }
}
