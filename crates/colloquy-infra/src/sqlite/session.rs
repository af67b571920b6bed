//! SQLite session store.
//!
//! Each session is the ordered set of `session_messages` rows sharing a
//! `session_key`, ordered by a per-session `seq`. A session exists as soon as
//! its first row does; clearing deletes the rows.

use colloquy_core::session::store::SessionStore;
use colloquy_types::chat::{ChatMessage, MessageRole};
use colloquy_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionStore`.
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: DatabasePool,
}

impl SqliteSessionStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to `ChatMessage`.
struct MessageRow {
    role: String,
    content: String,
    timestamp: i64,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let role: MessageRole = self.role.parse().map_err(RepositoryError::Query)?;
        Ok(ChatMessage {
            role,
            content: self.content,
            timestamp: self.timestamp,
        })
    }
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

impl SessionStore for SqliteSessionStore {
    async fn get_history(&self, session_key: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT role, content, timestamp FROM session_messages WHERE session_key = ? ORDER BY seq ASC",
        )
        .bind(session_key)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        rows.iter()
            .map(|row| {
                MessageRow::from_row(row)
                    .map_err(query_err)
                    .and_then(MessageRow::into_message)
            })
            .collect()
    }

    async fn add_message(
        &self,
        session_key: &str,
        message: &ChatMessage,
    ) -> Result<(), RepositoryError> {
        self.append_messages(session_key, std::slice::from_ref(message))
            .await
    }

    async fn append_messages(
        &self,
        session_key: &str,
        messages: &[ChatMessage],
    ) -> Result<(), RepositoryError> {
        if messages.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let last_seq: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(seq), 0) FROM session_messages WHERE session_key = ?",
        )
        .bind(session_key)
        .fetch_one(&mut *tx)
        .await
        .map_err(query_err)?;

        for (offset, message) in messages.iter().enumerate() {
            sqlx::query(
                "INSERT INTO session_messages (session_key, seq, role, content, timestamp) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(session_key)
            .bind(last_seq + 1 + offset as i64)
            .bind(message.role.to_string())
            .bind(&message.content)
            .bind(message.timestamp)
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;
        }

        tx.commit().await.map_err(query_err)?;
        Ok(())
    }

    async fn clear_history(&self, session_key: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM session_messages WHERE session_key = ?")
            .bind(session_key)
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    async fn message_count(&self, session_key: &str) -> Result<u64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM session_messages WHERE session_key = ?")
                .bind(session_key)
                .fetch_one(&self.pool.reader)
                .await
                .map_err(query_err)?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::default_database_url;

    async fn test_store(dir: &tempfile::TempDir) -> SqliteSessionStore {
        let pool = DatabasePool::new(&default_database_url(dir.path()))
            .await
            .unwrap();
        SqliteSessionStore::new(pool)
    }

    fn msg(role: MessageRole, content: &str, timestamp: i64) -> ChatMessage {
        ChatMessage {
            role,
            content: content.to_string(),
            timestamp,
        }
    }

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir).await;

        assert!(store.get_history("nobody").await.unwrap().is_empty());
        assert_eq!(store.message_count("nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sequential_adds_preserve_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir).await;

        for i in 0..5 {
            let role = if i % 2 == 0 {
                MessageRole::User
            } else {
                MessageRole::Assistant
            };
            store
                .add_message("s1", &msg(role, &format!("m{i}"), 1_000 + i))
                .await
                .unwrap();
        }

        let history = store.get_history("s1").await.unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m0", "m1", "m2", "m3", "m4"]);
        assert_eq!(history[1].role, MessageRole::Assistant);
        assert_eq!(history[4].timestamp, 1_004);
    }

    #[tokio::test]
    async fn test_append_batch_after_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir).await;

        store
            .add_message("s1", &msg(MessageRole::User, "first", 1))
            .await
            .unwrap();
        store
            .append_messages(
                "s1",
                &[
                    msg(MessageRole::User, "Build a todo app", 2),
                    msg(MessageRole::Assistant, "Use Workers + D1.", 3),
                ],
            )
            .await
            .unwrap();

        let history = store.get_history("s1").await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].content, "Build a todo app");
        assert_eq!(history[2].role, MessageRole::Assistant);
        assert_eq!(store.message_count("s1").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_clear_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir).await;

        store
            .add_message("s1", &msg(MessageRole::User, "hello", 1))
            .await
            .unwrap();
        store
            .add_message("s2", &msg(MessageRole::User, "other", 1))
            .await
            .unwrap();

        store.clear_history("s1").await.unwrap();
        store.clear_history("never-existed").await.unwrap();

        assert!(store.get_history("s1").await.unwrap().is_empty());
        assert_eq!(store.get_history("s2").await.unwrap().len(), 1);

        // A cleared session can be written to again from scratch.
        store
            .add_message("s1", &msg(MessageRole::User, "again", 2))
            .await
            .unwrap();
        assert_eq!(store.get_history("s1").await.unwrap()[0].content, "again");
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = test_store(&dir).await;
            store
                .add_message("s1", &msg(MessageRole::User, "persisted", 7))
                .await
                .unwrap();
        }

        let store = test_store(&dir).await;
        let history = store.get_history("s1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "persisted");
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir).await;

        store.append_messages("s1", &[]).await.unwrap();
        assert_eq!(store.message_count("s1").await.unwrap(), 0);
    }
}
