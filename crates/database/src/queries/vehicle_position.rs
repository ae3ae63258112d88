use sqlx::SqlitePool;

use crate::Result;

#[derive(Debug, Clone)]
pub struct VehiclePosition {
    pub trip_id: String,
    pub vehicle_id: String,
    pub route_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: i64,
}

/// Idempotent insert keyed on `(trip_id, timestamp)`.
pub async fn upsert(pool: &SqlitePool, row: &VehiclePosition) -> Result<()> {
    sqlx::query(
        "
        INSERT INTO vehicle_positions
            (trip_id, vehicle_id, route_id, latitude, longitude, timestamp)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (trip_id, timestamp) DO NOTHING
        ",
    )
    .bind(&row.trip_id)
    .bind(&row.vehicle_id)
    .bind(&row.route_id)
    .bind(row.latitude)
    .bind(row.longitude)
    .bind(row.timestamp)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn double_insert_does_not_duplicate() {
        let pool = memory_pool().await;
        let row = VehiclePosition {
            trip_id: "3813_1".to_owned(),
            vehicle_id: "v1".to_owned(),
            route_id: "3813".to_owned(),
            latitude: 12.9,
            longitude: 77.5,
            timestamp: 1_000,
        };
        upsert(&pool, &row).await.unwrap();
        upsert(&pool, &row).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicle_positions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
