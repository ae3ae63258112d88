use std::env;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub mod queries;

use queries::completed_stop_time::{self, CompletedStopTime};
use queries::vehicle_position::{self, VehiclePosition};

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("sqlite error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Reads `KIA_DB_PATH` (default `./kia-live.sqlite3`), connects, and
    /// runs pending migrations.
    pub async fn connect_from_env() -> Result<Self> {
        let path =
            env::var("KIA_DB_PATH").unwrap_or_else(|_| "./kia-live.sqlite3".to_owned());
        Self::connect(&path).await
    }

    pub async fn connect(path: &str) -> Result<Self> {
        let url = format!("sqlite://{}?mode=rwc", path);
        let pool = SqlitePoolOptions::new().max_connections(5).connect(&url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Mirrors a completed stop event into the relational store. Failures
    /// are logged and swallowed: the caller's feed publish must not depend
    /// on this succeeding.
    pub async fn record_completed_stop_time(&self, row: CompletedStopTime) {
        if let Err(error) = completed_stop_time::upsert(&self.pool, &row).await {
            log::warn!("failed to record completed stop time for {}: {error}", row.trip_id);
        }
    }

    /// Mirrors a vehicle position into the relational store, same
    /// best-effort policy as [`Store::record_completed_stop_time`].
    pub async fn record_vehicle_position(&self, row: VehiclePosition) {
        if let Err(error) = vehicle_position::upsert(&self.pool, &row).await {
            log::warn!("failed to record vehicle position for {}: {error}", row.trip_id);
        }
    }
}
