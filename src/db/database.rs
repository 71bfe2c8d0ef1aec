use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::models::RotationRow;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn init(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS rotation_state (\
                id INTEGER PRIMARY KEY AUTOINCREMENT,\
                user_id TEXT NOT NULL,\
                vibe TEXT NOT NULL,\
                fashion_style TEXT NOT NULL,\
                outfit_index INTEGER NOT NULL DEFAULT 0,\
                location_index INTEGER NOT NULL DEFAULT 0,\
                accessory_index INTEGER NOT NULL DEFAULT 0,\
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,\
                UNIQUE(user_id, vibe, fashion_style)\
            );",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_rotation_state_user_id ON rotation_state(user_id);",
        )
        .execute(&pool)
        .await?;

        info!("Database tables created successfully");

        Ok(Database { pool })
    }

    /// Read-only lookup; a missing row is `Ok(None)`, never an insert.
    pub async fn fetch_rotation_row(
        &self,
        user_id: &str,
        vibe: &str,
        fashion_style: &str,
    ) -> Result<Option<RotationRow>> {
        let row = sqlx::query_as::<_, RotationRow>(
            "SELECT id, user_id, vibe, fashion_style, outfit_index, location_index, accessory_index, updated_at \
             FROM rotation_state WHERE user_id = ? AND vibe = ? AND fashion_style = ?",
        )
        .bind(user_id)
        .bind(vibe)
        .bind(fashion_style)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Lazily creates the row at the given steps, or adds the steps to the
    /// existing counters. Counters only ever grow.
    pub async fn advance_rotation_row(
        &self,
        user_id: &str,
        vibe: &str,
        fashion_style: &str,
        outfit_step: i64,
        location_step: i64,
        accessory_step: i64,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO rotation_state (user_id, vibe, fashion_style, outfit_index, location_index, accessory_index) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(user_id, vibe, fashion_style) DO UPDATE SET \
             outfit_index = rotation_state.outfit_index + excluded.outfit_index, \
             location_index = rotation_state.location_index + excluded.location_index, \
             accessory_index = rotation_state.accessory_index + excluded.accessory_index, \
             updated_at = CURRENT_TIMESTAMP",
        )
        .bind(user_id)
        .bind(vibe)
        .bind(fashion_style)
        .bind(outfit_step)
        .bind(location_step)
        .bind(accessory_step)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
