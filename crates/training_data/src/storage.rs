use std::path::Path;

use chrono::{NaiveDateTime, TimeZone, Utc};
use rusqlite::{params, Connection, Row};
use thiserror::Error;

use crate::types::{TrainingExample, TrainingPair};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// SQLite-backed store owning a single connection.
///
/// Every insert runs in autocommit mode, so each row is its own durable unit.
/// The connection is released by [`TrainingStore::close`] or, failing that,
/// when the store is dropped.
#[derive(Debug)]
pub struct TrainingStore {
    connection: Connection,
}

impl TrainingStore {
    /// Open (creating if needed) the database at `path` and migrate it.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let connection = Connection::open(path)?;
        // journal_mode answers with a row, so it has to go through the checked variant
        connection.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        connection.pragma_update(None, "synchronous", "FULL")?;
        Self::from_connection(connection)
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> StorageResult<Self> {
        let store = Self { connection };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> StorageResult<()> {
        self.connection.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS training_examples (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                prompt TEXT NOT NULL,
                completion TEXT NOT NULL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )?;
        Ok(())
    }

    /// Insert one pair and return it with its storage-assigned id and timestamp.
    pub fn insert(&self, prompt: &str, completion: &str) -> StorageResult<TrainingExample> {
        self.connection.execute(
            "INSERT INTO training_examples (prompt, completion) VALUES (?1, ?2)",
            params![prompt, completion],
        )?;
        let id = self.connection.last_insert_rowid();

        let example = self.connection.query_row(
            "SELECT id, prompt, completion, timestamp FROM training_examples WHERE id = ?1",
            params![id],
            example_from_row,
        )?;
        Ok(example)
    }

    pub fn count(&self) -> StorageResult<u64> {
        let count: i64 =
            self.connection
                .query_row("SELECT COUNT(*) FROM training_examples", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Every stored example in insertion order.
    pub fn examples(&self) -> StorageResult<Vec<TrainingExample>> {
        let mut statement = self.connection.prepare(
            "SELECT id, prompt, completion, timestamp FROM training_examples ORDER BY id",
        )?;
        let rows = statement.query_map([], example_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Every stored pair in insertion order, without id or timestamp.
    pub fn pairs(&self) -> StorageResult<Vec<TrainingPair>> {
        let mut statement = self
            .connection
            .prepare("SELECT prompt, completion FROM training_examples ORDER BY id")?;
        let rows = statement.query_map([], |row| {
            Ok(TrainingPair {
                prompt: row.get(0)?,
                completion: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Release the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> StorageResult<()> {
        self.connection
            .close()
            .map_err(|(_, error)| StorageError::Sqlite(error))
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.connection
    }
}

fn example_from_row(row: &Row<'_>) -> rusqlite::Result<TrainingExample> {
    let timestamp: NaiveDateTime = row.get(3)?;
    Ok(TrainingExample {
        id: row.get(0)?,
        prompt: row.get(1)?,
        completion: row.get(2)?,
        created_at: Utc.from_utc_datetime(&timestamp),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    use super::TrainingStore;
    use crate::types::TrainingPair;

    #[test]
    fn store_assigns_increasing_ids_and_timestamps() {
        let store = TrainingStore::open_in_memory().expect("open store");
        let before = Utc::now() - Duration::seconds(5);

        let first = store.insert("سلام", "درود").expect("first insert");
        let second = store.insert("خداحافظ", "بدرود").expect("second insert");

        assert!(second.id > first.id);
        assert_eq!(first.prompt, "سلام");
        assert_eq!(first.completion, "درود");
        assert!(first.created_at >= before);
        assert!(first.created_at <= Utc::now() + Duration::seconds(5));
    }

    #[test]
    fn store_counts_and_scans_in_insertion_order() {
        let store = TrainingStore::open_in_memory().expect("open store");
        assert_eq!(store.count().expect("count"), 0);
        assert!(store.pairs().expect("pairs").is_empty());

        for (prompt, completion) in [("c", "3"), ("a", "1"), ("b", "2")] {
            store.insert(prompt, completion).expect("insert");
        }

        assert_eq!(store.count().expect("count"), 3);
        assert_eq!(
            store.pairs().expect("pairs"),
            vec![
                TrainingPair::new("c", "3"),
                TrainingPair::new("a", "1"),
                TrainingPair::new("b", "2"),
            ]
        );

        let examples = store.examples().expect("examples");
        let ids: Vec<i64> = examples.iter().map(|example| example.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn store_persists_across_reopen_and_migration_is_idempotent() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("training_data.db");

        let store = TrainingStore::open(&path).expect("open store");
        store.insert("prompt", "completion").expect("insert");
        store.close().expect("close store");

        let reopened = TrainingStore::open(&path).expect("reopen store");
        assert_eq!(reopened.count().expect("count"), 1);
        assert_eq!(
            reopened.pairs().expect("pairs"),
            vec![TrainingPair::new("prompt", "completion")]
        );
        reopened.close().expect("close store");
    }

    #[test]
    fn autoincrement_ids_are_not_reused() {
        let store = TrainingStore::open_in_memory().expect("open store");
        let first = store.insert("a", "1").expect("insert");
        store
            .connection()
            .execute("DELETE FROM training_examples", [])
            .expect("delete rows");

        let second = store.insert("b", "2").expect("insert");
        assert!(second.id > first.id);
    }
}
