use std::time::Duration;

use sqlx::Row;
use tokio::time::timeout;
use uuid::Uuid;

use super::Database;

/// Server-enforced bound on every storage call.
const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// A stored entry row: ciphertext plus the owner modulus it was created under.
///
/// The payload is opaque to the server; confidentiality rests entirely on the
/// client-side encryption.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub id: Uuid,
    pub public_key: Vec<u8>,
    pub payload: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage call timed out")]
    Timeout,
}

impl Database {
    /// Insert a new entry and return its freshly assigned id.
    pub async fn create_entry(
        &self,
        public_key: &[u8],
        payload: &[u8],
    ) -> Result<Uuid, StorageError> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let query = sqlx::query(
            r#"
            INSERT INTO entries (id, public_key, payload)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(public_key)
        .bind(payload)
        .execute(&**self);

        timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| StorageError::Timeout)??;

        Ok(id)
    }

    /// Fetch an entry by id. `None` means no such row.
    pub async fn get_entry(&self, id: &Uuid) -> Result<Option<StoredEntry>, StorageError> {
        let id_str = id.to_string();

        let query = sqlx::query(
            r#"
            SELECT public_key, payload
            FROM entries
            WHERE id = ?
            "#,
        )
        .bind(&id_str)
        .fetch_optional(&**self);

        let row = timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| StorageError::Timeout)??;

        Ok(row.map(|r| StoredEntry {
            id: *id,
            public_key: r.get("public_key"),
            payload: r.get("payload"),
        }))
    }

    /// Fetch every entry created under the given owner key.
    pub async fn get_entries_for(
        &self,
        public_key: &[u8],
    ) -> Result<Vec<StoredEntry>, StorageError> {
        let query = sqlx::query(
            r#"
            SELECT id, payload
            FROM entries
            WHERE public_key = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(public_key)
        .fetch_all(&**self);

        let rows = timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| StorageError::Timeout)??;

        rows.into_iter()
            .map(|r| {
                let id_str: String = r.get("id");
                let id = Uuid::parse_str(&id_str).map_err(|_| {
                    StorageError::Database(sqlx::Error::Decode(
                        format!("invalid entry id in database: {}", id_str).into(),
                    ))
                })?;
                Ok(StoredEntry {
                    id,
                    public_key: public_key.to_vec(),
                    payload: r.get("payload"),
                })
            })
            .collect()
    }

    /// Replace an entry's payload wholesale. Returns false if no row matched.
    pub async fn update_entry(&self, id: &Uuid, payload: &[u8]) -> Result<bool, StorageError> {
        let id_str = id.to_string();

        let query = sqlx::query(
            r#"
            UPDATE entries
            SET payload = ?
            WHERE id = ?
            "#,
        )
        .bind(payload)
        .bind(&id_str)
        .execute(&**self);

        let result = timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| StorageError::Timeout)??;

        Ok(result.rows_affected() > 0)
    }

    /// Remove an entry. Returns false if no row matched, so two racing
    /// deletes resolve to exactly one success.
    pub async fn delete_entry(&self, id: &Uuid) -> Result<bool, StorageError> {
        let id_str = id.to_string();

        let query = sqlx::query(
            r#"
            DELETE FROM entries
            WHERE id = ?
            "#,
        )
        .bind(&id_str)
        .execute(&**self);

        let result = timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| StorageError::Timeout)??;

        Ok(result.rows_affected() > 0)
    }
}
