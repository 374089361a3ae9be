/// Embedded schema migrations
///
/// SQL files under `clubhouse-shared/migrations/` are compiled into the
/// binary; `run_migrations` applies whichever are missing.

use sqlx::migrate::{MigrateDatabase, MigrateError, Migrator};
use sqlx::postgres::{PgPool, Postgres};
use tracing::{debug, info};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied_migrations: usize,

    /// Version of the newest applied migration
    pub latest_version: Option<i64>,

    /// Embedded migrations not yet applied
    pub pending_migrations: usize,
}

impl MigrationStatus {
    pub fn is_current(&self) -> bool {
        self.pending_migrations == 0
    }
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let embedded = MIGRATOR.iter().count();
    info!(embedded, "Applying schema migrations");

    MIGRATOR.run(pool).await?;

    info!("Schema is up to date");
    Ok(())
}

/// Compares the applied versions against the embedded set
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let tracked: bool =
        sqlx::query_scalar("SELECT to_regclass('public._sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await?;

    let applied: Vec<i64> = if tracked {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version")
            .fetch_all(pool)
            .await?
    } else {
        Vec::new()
    };

    let pending_migrations = MIGRATOR
        .iter()
        .filter(|migration| !applied.contains(&migration.version))
        .count();

    let status = MigrationStatus {
        applied_migrations: applied.len(),
        latest_version: applied.last().copied(),
        pending_migrations,
    };
    debug!(?status, "Migration status");

    Ok(status)
}

/// Creates the target database when it is missing
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        return Ok(());
    }

    info!("Creating missing database");
    Postgres::create_database(database_url).await
}
