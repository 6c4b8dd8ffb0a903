//! Whole-collection persistence in a single storage slot.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::Card;

/// Reads and writes the serialized collection under one key.
#[derive(Clone)]
pub struct SlotStorage {
    pool: SqlitePool,
    key: String,
    max_bytes: usize,
}

impl SlotStorage {
    pub fn new(pool: SqlitePool, key: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            pool,
            key: key.into(),
            max_bytes,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the collection. An absent slot is an empty collection.
    pub async fn load(&self) -> Result<Vec<Card>, AppError> {
        let Some(raw) = self.read_raw().await? else {
            return Ok(Vec::new());
        };

        let cards: Vec<Card> = serde_json::from_str(&raw)?;
        tracing::debug!("Loaded {} cards from slot {}", cards.len(), self.key);
        Ok(cards)
    }

    /// Replace the slot contents with the serialized collection.
    pub async fn save(&self, cards: &[Card]) -> Result<(), AppError> {
        let raw = serde_json::to_string(cards)
            .map_err(|e| AppError::Persistence(format!("Failed to serialize collection: {}", e)))?;

        if raw.len() > self.max_bytes {
            tracing::error!(
                "Collection of {} bytes exceeds slot capacity of {} bytes",
                raw.len(),
                self.max_bytes
            );
            return Err(AppError::Persistence(format!(
                "Storage quota exceeded: collection needs {} bytes, slot holds {}",
                raw.len(),
                self.max_bytes
            )));
        }

        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO storage_slots (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(&self.key)
        .bind(&raw)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Saved {} cards to slot {}", cards.len(), self.key);
        Ok(())
    }

    /// Raw slot value, if any.
    pub async fn read_raw(&self) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM storage_slots WHERE key = ?")
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    /// Overwrite the slot with arbitrary text.
    #[cfg(test)]
    pub async fn write_raw(&self, raw: &str) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO storage_slots (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(&self.key)
        .bind(raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
