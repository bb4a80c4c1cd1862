use std::cmp::Ordering;

use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// Handed to each module once the schema is up to date
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// One forward-only schema step.
///
/// Ids share a single namespace across modules and sort lexically, so a
/// numeric prefix (`0001_create_authors`) decides the order tables appear in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

impl Migration {
    pub const fn new(id: &'static str, up: &'static str) -> Self {
        Self { id, up }
    }
}

impl Ord for Migration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(other.id)
    }
}

impl PartialOrd for Migration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A catalog resource: its tables, its HTTP surface and its API docs.
#[async_trait]
pub trait Module: Send + Sync {
    /// Path segment under `/api` and key in the migration ledger
    fn name(&self) -> &'static str;

    /// Schema this module owns
    fn migrations(&self) -> Vec<Migration> {
        Vec::new()
    }

    /// Routes relative to the module prefix; `/` is the prefix itself
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment with `paths` relative to the module prefix and
    /// `components.schemas`
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Runs after migrations, before the listener binds
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_order_by_id() {
        let mut migrations = vec![
            Migration::new("0003_create_books", ""),
            Migration::new("0001_create_authors", ""),
            Migration::new("0002_create_genres", ""),
        ];
        migrations.sort();

        let ids: Vec<_> = migrations.iter().map(|m| m.id).collect();
        assert_eq!(ids, ["0001_create_authors", "0002_create_genres", "0003_create_books"]);
    }
}
