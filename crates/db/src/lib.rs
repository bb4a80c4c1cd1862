//! SQLite pool factory and migration tooling.

use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use bookstore_kernel::{settings::DatabaseSettings, ModuleRegistry};

const LEDGER_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL PRIMARY KEY,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

/// Open a connection pool for the configured database.
///
/// Foreign key enforcement is switched on for every connection.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to '{}'", settings.url))?;

    tracing::info!(url = %settings.url, "database pool ready");
    Ok(pool)
}

/// Open a private in-memory database.
///
/// Each in-memory connection is its own database, so the pool is pinned to a
/// single connection that is never recycled.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("failed to open in-memory database")
}

/// Apply every migration contributed by the registry's modules that has not
/// been applied yet. Returns the number of migrations applied.
pub async fn run_migrations(pool: &SqlitePool, registry: &ModuleRegistry) -> anyhow::Result<usize> {
    sqlx::raw_sql(LEDGER_DDL)
        .execute(pool)
        .await
        .context("failed to create migration ledger")?;

    let mut applied = 0;
    for (module, migration) in registry.collect_migrations() {
        let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations WHERE id = ?")
            .bind(migration.id)
            .fetch_one(pool)
            .await
            .with_context(|| format!("failed to read ledger for '{}'", migration.id))?;

        if recorded > 0 {
            tracing::debug!(module = %module, migration = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await.context("failed to open migration transaction")?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration '{}' of module '{}' failed", migration.id, module))?;
        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to record migration '{}'", migration.id))?;
        tx.commit().await.context("failed to commit migration")?;

        tracing::info!(module = %module, migration = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
