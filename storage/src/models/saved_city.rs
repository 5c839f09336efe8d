//! Saved city model.
//!
//! Maps to the `cities` table (the `city` column is selected as `name`) and is returned by
//! CityRepository::list_cities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SavedCity {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
