use anyhow::Context;
use serde_json::Number;
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};

use crate::model::{Boat, BoatData, BoatId};
use crate::store::traits::{BoatStore, StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the boats table. The UNIQUE constraint on `name` is what makes
    /// concurrent writers unable to both claim a name.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS boats (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                "type" TEXT NOT NULL,
                length DOUBLE PRECISION NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create boats table")?;

        Ok(())
    }
}

fn boat_from_row(row: &PgRow) -> Boat {
    Boat::new(
        row.get("id"),
        BoatData {
            name: row.get("name"),
            boat_type: row.get("type"),
            length: number_from_f64(row.get("length")),
        },
    )
}

/// Whole lengths come back as integers so `269` does not turn into `269.0`.
fn number_from_f64(value: f64) -> Number {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Number::from(value as i64)
    } else {
        Number::from_f64(value).unwrap_or_else(|| Number::from(0))
    }
}

fn length_to_f64(length: &Number) -> StoreResult<f64> {
    length
        .as_f64()
        .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("length {} is not representable", length)))
}

/// Maps a write failure, surfacing unique-index violations as `NameTaken`.
fn write_error(err: sqlx::Error, name: &str, action: &'static str) -> StoreError {
    let unique_violation = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if unique_violation {
        StoreError::NameTaken(name.to_string())
    } else {
        StoreError::Backend(anyhow::Error::new(err).context(action))
    }
}

#[async_trait::async_trait]
impl BoatStore for PostgresStore {
    async fn list_boats(&self) -> StoreResult<Vec<Boat>> {
        let rows = sqlx::query(r#"SELECT id, name, "type", length FROM boats ORDER BY id"#)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list boats")?;

        Ok(rows.iter().map(boat_from_row).collect())
    }

    async fn get_boat(&self, id: BoatId) -> StoreResult<Option<Boat>> {
        let row = sqlx::query(r#"SELECT id, name, "type", length FROM boats WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch boat")?;

        Ok(row.as_ref().map(boat_from_row))
    }

    async fn insert_boat(&self, data: BoatData) -> StoreResult<BoatId> {
        let length = length_to_f64(&data.length)?;
        let row = sqlx::query(
            r#"INSERT INTO boats (name, "type", length) VALUES ($1, $2, $3) RETURNING id"#,
        )
        .bind(&data.name)
        .bind(&data.boat_type)
        .bind(length)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &data.name, "Failed to insert boat"))?;

        Ok(row.get("id"))
    }

    async fn update_boat(&self, id: BoatId, data: BoatData) -> StoreResult<()> {
        let length = length_to_f64(&data.length)?;
        let result = sqlx::query(
            r#"UPDATE boats SET name = $2, "type" = $3, length = $4 WHERE id = $1"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.boat_type)
        .bind(length)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &data.name, "Failed to update boat"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_boat(&self, id: BoatId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM boats WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete boat")?;

        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
        log::info!("postgres pool closed");
    }
}
