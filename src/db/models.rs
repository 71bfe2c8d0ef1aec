use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RotationRow {
    pub id: i64,
    pub user_id: String,
    pub vibe: String,
    pub fashion_style: String,
    pub outfit_index: i64,
    pub location_index: i64,
    pub accessory_index: i64,
    pub updated_at: DateTime<Utc>,
}
