//! # PostgreSQL adapter
//!
//! Maps the relational model onto the domain types. Each repository port
//! lives in its own submodule; they all share one [`PgStore`] pool.

mod applications;
mod forum;
mod pets;
mod reports;
mod users;

use domains::{DomainError, PhotoList};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and brings the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(storage)?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), DomainError> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        info!("database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) fn storage(e: sqlx::Error) -> DomainError {
    DomainError::Storage(e.to_string())
}

/// Reads a JSONB photo column. Unreadable values are logged and read as empty.
pub(crate) fn decode_photos(value: Option<serde_json::Value>, owner: &str, id: i64) -> PhotoList {
    let Some(value) = value else {
        return PhotoList::default();
    };
    PhotoList::from_json(&value).unwrap_or_else(|e| {
        warn!(owner, id, error = %e, "unreadable photo list, treating as empty");
        PhotoList::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_column_reads_as_empty() {
        assert!(decode_photos(None, "pet", 1).is_empty());
        assert!(decode_photos(Some(serde_json::Value::Null), "pet", 1).is_empty());
    }

    #[test]
    fn array_column_is_kept_in_order() {
        let photos = decode_photos(Some(json!(["uploads/a.jpg", "uploads/b.jpg"])), "pet", 1);
        assert_eq!(photos.as_slice(), ["uploads/a.jpg", "uploads/b.jpg"]);
    }

    #[test]
    fn string_holding_an_array_is_accepted() {
        let legacy = serde_json::Value::String(r#"["uploads\\old.jpg"]"#.to_owned());
        let photos = decode_photos(Some(legacy), "report", 2);
        assert_eq!(photos.as_slice(), ["uploads/old.jpg"]);
    }

    #[test]
    fn objects_and_numbers_read_as_empty() {
        assert!(decode_photos(Some(json!({ "path": "uploads/a.jpg" })), "post", 3).is_empty());
        assert!(decode_photos(Some(json!(42)), "post", 3).is_empty());
        assert!(decode_photos(Some(json!([1, 2])), "post", 3).is_empty());
        assert!(decode_photos(Some(json!("not json")), "post", 3).is_empty());
    }
}
