//! Storage layer for geominder.
//!
//! This module provides the `SQLite`-backed reminder DAO. It knows nothing
//! about result wrapping or validation; see [`crate::data`] for the
//! repository façade built on top of it.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::reminder::Reminder;

const REMINDER_COLUMNS: &str = "id, title, description, location, latitude, longitude";

/// Storage engine for reminders.
///
/// One table, keyed by reminder id. Saving an existing id replaces the row
/// in place; listings come back in first-insert order.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // journal_mode returns a row, so it can't go through execute().
        conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))?;
        conn.execute_batch("PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a reminder, replacing any existing row with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinates`] for non-finite coordinates, or an
    /// error if the database operation fails.
    pub fn save_reminder(&self, reminder: &Reminder) -> Result<()> {
        reminder.ensure_storable()?;
        self.conn.execute(
            r"
            INSERT INTO reminders (id, seq, title, description, location, latitude, longitude)
            VALUES (?1, (SELECT COALESCE(MAX(seq), 0) + 1 FROM reminders), ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                location = excluded.location,
                latitude = excluded.latitude,
                longitude = excluded.longitude
            ",
            params![
                reminder.id(),
                reminder.title,
                reminder.description,
                reminder.location,
                reminder.latitude,
                reminder.longitude,
            ],
        )?;

        debug!("Saved reminder {}", reminder.id());
        Ok(())
    }

    /// Get all reminders in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_reminders(&self) -> Result<Vec<Reminder>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {REMINDER_COLUMNS} FROM reminders ORDER BY seq ASC"))?;

        let reminders = stmt
            .query_map([], Self::row_to_reminder)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(reminders)
    }

    /// Get a reminder by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_reminder_by_id(&self, id: &str) -> Result<Option<Reminder>> {
        let result = self
            .conn
            .query_row(
                &format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?1"),
                [id],
                Self::row_to_reminder,
            )
            .optional()?;
        Ok(result)
    }

    /// Delete every reminder.
    ///
    /// Returns the number of reminders deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_all_reminders(&self) -> Result<usize> {
        let affected = self.conn.execute("DELETE FROM reminders", [])?;
        info!("Deleted {} reminders", affected);
        Ok(affected)
    }

    /// Count total reminders in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM reminders", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_reminders = self.count()?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_reminders,
            db_size_bytes,
        })
    }

    /// Convert a database row to a Reminder.
    fn row_to_reminder(row: &rusqlite::Row) -> rusqlite::Result<Reminder> {
        Ok(Reminder::with_id(
            row.get::<_, String>(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of reminders stored.
    pub total_reminders: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn home_depot() -> Reminder {
        Reminder::new(
            Some("New Reminder".to_string()),
            Some("New Description".to_string()),
            Some("Home Depot".to_string()),
            20.0,
            25.0,
        )
    }

    fn updated_home_depot() -> Reminder {
        Reminder::new(
            Some("Updated Reminder".to_string()),
            Some("Updated Description".to_string()),
            Some("Updated Home Depot".to_string()),
            30.0,
            35.0,
        )
    }

    #[test]
    fn test_open_in_memory() {
        assert!(Storage::open_in_memory().is_ok());
    }

    #[test]
    fn test_insert_reminder_and_get_by_id() {
        let storage = create_test_storage();
        let reminder = home_depot();

        storage.save_reminder(&reminder).unwrap();
        let loaded = storage.get_reminder_by_id(reminder.id()).unwrap();

        assert_eq!(loaded, Some(reminder));
    }

    #[test]
    fn test_reminder_not_found_by_id() {
        let storage = create_test_storage();
        assert!(storage.get_reminder_by_id("random_id").unwrap().is_none());
    }

    #[test]
    fn test_get_all_reminders_in_insertion_order() {
        let storage = create_test_storage();
        let first = home_depot();
        let second = updated_home_depot();

        storage.save_reminder(&first).unwrap();
        storage.save_reminder(&second).unwrap();

        let loaded = storage.get_reminders().unwrap();
        assert_eq!(loaded, vec![first, second]);
    }

    #[test]
    fn test_save_replaces_existing_without_reordering() {
        let storage = create_test_storage();
        let mut first = home_depot();
        let second = updated_home_depot();
        storage.save_reminder(&first).unwrap();
        storage.save_reminder(&second).unwrap();

        first.title = Some("Renamed".to_string());
        storage.save_reminder(&first).unwrap();

        let loaded = storage.get_reminders().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id(), first.id());
        assert_eq!(loaded[0].title.as_deref(), Some("Renamed"));
        assert_eq!(loaded[1].id(), second.id());
    }

    #[test]
    fn test_delete_reminders() {
        let storage = create_test_storage();
        storage.save_reminder(&home_depot()).unwrap();
        storage.save_reminder(&updated_home_depot()).unwrap();

        assert_eq!(storage.delete_all_reminders().unwrap(), 2);
        assert!(storage.get_reminders().unwrap().is_empty());
        assert_eq!(storage.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_all_on_empty_store() {
        let storage = create_test_storage();
        assert_eq!(storage.delete_all_reminders().unwrap(), 0);
    }

    #[test]
    fn test_order_restarts_after_delete_all() {
        let storage = create_test_storage();
        storage.save_reminder(&home_depot()).unwrap();
        storage.delete_all_reminders().unwrap();

        let a = updated_home_depot();
        let b = home_depot();
        storage.save_reminder(&a).unwrap();
        storage.save_reminder(&b).unwrap();

        let ids: Vec<String> = storage
            .get_reminders()
            .unwrap()
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, vec![a.id().to_string(), b.id().to_string()]);
    }

    #[test]
    fn test_null_fields_round_trip() {
        let storage = create_test_storage();
        let reminder = Reminder::new(None, None, None, -33.8568, 151.2153);

        storage.save_reminder(&reminder).unwrap();
        let loaded = storage.get_reminder_by_id(reminder.id()).unwrap().unwrap();

        assert!(loaded.title.is_none());
        assert!(loaded.description.is_none());
        assert!(loaded.location.is_none());
        assert_eq!(loaded.latitude, -33.8568);
        assert_eq!(loaded.longitude, 151.2153);
    }

    #[test]
    fn test_unicode_fields() {
        let storage = create_test_storage();
        let reminder = Reminder::new(
            Some("買い物 🛒".to_string()),
            None,
            Some("東京駅".to_string()),
            35.6812,
            139.7671,
        );

        storage.save_reminder(&reminder).unwrap();
        let loaded = storage.get_reminder_by_id(reminder.id()).unwrap().unwrap();
        assert_eq!(loaded.title.as_deref(), Some("買い物 🛒"));
        assert_eq!(loaded.location.as_deref(), Some("東京駅"));
    }

    #[test]
    fn test_count() {
        let storage = create_test_storage();
        assert_eq!(storage.count().unwrap(), 0);

        storage.save_reminder(&home_depot()).unwrap();
        storage.save_reminder(&updated_home_depot()).unwrap();

        assert_eq!(storage.count().unwrap(), 2);
    }

    #[test]
    fn test_stats_in_memory() {
        let storage = create_test_storage();
        storage.save_reminder(&home_depot()).unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.total_reminders, 1);
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_file_based_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("reminders.db");
        let reminder = home_depot();

        {
            let storage = Storage::open(&db_path).unwrap();
            storage.save_reminder(&reminder).unwrap();
            assert_eq!(storage.path(), db_path);
            assert!(storage.stats().unwrap().db_size_bytes > 0);
        }

        let reopened = Storage::open(&db_path).unwrap();
        assert_eq!(
            reopened.get_reminder_by_id(reminder.id()).unwrap(),
            Some(reminder)
        );
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/reminders.db");

        let storage = Storage::open(&nested_path).unwrap();
        assert!(nested_path.exists());
        drop(storage);
    }
}
