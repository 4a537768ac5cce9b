use crate::error::Result;
use crate::storage::{Storage, KEY_ACCOUNT, KEY_IS_ADMIN};
use rusqlite::{params, OptionalExtension};

pub struct SessionStore<'a> {
    storage: &'a Storage,
}

impl<'a> SessionStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.storage.get_connection().await;

        let value = conn
            .query_row(
                "SELECT value FROM session WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    /// Writes both session keys in one transaction, replacing any prior session.
    pub async fn save_session(&self, account: &str, is_admin: bool) -> Result<()> {
        let mut conn = self.storage.get_connection().await;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO session (key, value) VALUES (?1, ?2)",
            params![KEY_ACCOUNT, account],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO session (key, value) VALUES (?1, ?2)",
            params![KEY_IS_ADMIN, is_admin.to_string()],
        )?;

        tx.commit()?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        let conn = self.storage.get_connection().await;

        conn.execute(
            "DELETE FROM session WHERE key IN (?1, ?2)",
            params![KEY_ACCOUNT, KEY_IS_ADMIN],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_and_clear_session() {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::new(&temp_dir.path().join("nested").join("rps.db"))
            .await
            .unwrap();
        let store = SessionStore::new(&storage);

        assert_eq!(store.get(KEY_ACCOUNT).await.unwrap(), None);

        store.save_session("0xabc", true).await.unwrap();
        assert_eq!(store.get(KEY_ACCOUNT).await.unwrap().as_deref(), Some("0xabc"));
        assert_eq!(store.get(KEY_IS_ADMIN).await.unwrap().as_deref(), Some("true"));

        store.save_session("0xdef", false).await.unwrap();
        assert_eq!(store.get(KEY_ACCOUNT).await.unwrap().as_deref(), Some("0xdef"));
        assert_eq!(store.get(KEY_IS_ADMIN).await.unwrap().as_deref(), Some("false"));

        store.clear().await.unwrap();
        assert_eq!(store.get(KEY_ACCOUNT).await.unwrap(), None);
        assert_eq!(store.get(KEY_IS_ADMIN).await.unwrap(), None);

        // clearing an empty store is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_session_survives_reopen() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("rps.db");

        {
            let storage = Storage::new(&db_path).await.unwrap();
            SessionStore::new(&storage)
                .save_session("0xabc", false)
                .await
                .unwrap();
        }

        let storage = Storage::new(&db_path).await.unwrap();
        let store = SessionStore::new(&storage);
        assert_eq!(store.get(KEY_ACCOUNT).await.unwrap().as_deref(), Some("0xabc"));
    }
}
