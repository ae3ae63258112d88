use sqlx::SqlitePool;

use crate::Result;

#[derive(Debug, Clone)]
pub struct CompletedStopTime {
    pub stop_id: String,
    pub trip_id: String,
    pub route_id: String,
    pub date: String,
    pub scheduled_arrival: Option<i64>,
    pub actual_arrival: Option<i64>,
    pub scheduled_departure: Option<i64>,
    pub actual_departure: Option<i64>,
}

/// Idempotent insert keyed on `(stop_id, trip_id, date)`; a repeated poll of
/// the same stop refreshes the actual times rather than erroring.
pub async fn upsert(pool: &SqlitePool, row: &CompletedStopTime) -> Result<()> {
    sqlx::query(
        "
        INSERT INTO completed_stop_times
            (stop_id, trip_id, route_id, date, scheduled_arrival, actual_arrival, scheduled_departure, actual_departure)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (stop_id, trip_id, date) DO UPDATE SET
            actual_arrival = excluded.actual_arrival,
            actual_departure = excluded.actual_departure
        ",
    )
    .bind(&row.stop_id)
    .bind(&row.trip_id)
    .bind(&row.route_id)
    .bind(&row.date)
    .bind(row.scheduled_arrival)
    .bind(row.actual_arrival)
    .bind(row.scheduled_departure)
    .bind(row.actual_departure)
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

    fn sample() -> CompletedStopTime {
        CompletedStopTime {
            stop_id: "s1".to_owned(),
            trip_id: "3813_1".to_owned(),
            route_id: "3813".to_owned(),
            date: "2026-07-27".to_owned(),
            scheduled_arrival: Some(1_000),
            actual_arrival: Some(1_060),
            scheduled_departure: None,
            actual_departure: None,
        }
    }

    #[tokio::test]
    async fn double_insert_does_not_duplicate() {
        let pool = memory_pool().await;
        upsert(&pool, &sample()).await.unwrap();
        upsert(&pool, &sample()).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM completed_stop_times")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
