//! `SQLite`-backed repository.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ReminderDataSource;
use crate::error::{Error, Result};
use crate::reminder::Reminder;
use crate::storage::{Storage, StorageStats};

/// Repository that persists reminders through [`Storage`].
///
/// Every call runs on tokio's blocking pool so the async caller never waits
/// on disk I/O directly. Access to the connection is serialized.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    storage: Arc<Mutex<Storage>>,
}

impl LocalRepository {
    /// Wrap an already opened storage.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
        }
    }

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Storage::open(path).map(Self::new)
    }

    /// Create a repository over a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Storage::open_in_memory().map(Self::new)
    }

    /// Reminder count and database file size.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub async fn stats(&self) -> Result<StorageStats> {
        self.with_storage(Storage::stats).await
    }

    /// Run `op` against the storage on the blocking pool.
    async fn with_storage<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Storage) -> Result<T> + Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || {
            let guard = storage
                .lock()
                .map_err(|_| Error::internal("reminder storage lock poisoned"))?;
            op(&guard)
        })
        .await
        .map_err(|e| Error::internal(format!("storage task failed: {e}")))?
    }
}

#[async_trait]
impl ReminderDataSource for LocalRepository {
    async fn get_reminders(&self) -> Result<Vec<Reminder>> {
        self.with_storage(Storage::get_reminders)
            .await
            .inspect_err(|e| warn!("Failed to load reminders: {e}"))
    }

    async fn get_reminder(&self, id: &str) -> Result<Reminder> {
        let id = id.to_string();
        self.with_storage(move |storage| {
            storage
                .get_reminder_by_id(&id)?
                .ok_or_else(|| Error::not_found(id))
        })
        .await
    }

    async fn save_reminder(&self, reminder: &Reminder) -> Result<()> {
        let reminder = reminder.clone();
        self.with_storage(move |storage| storage.save_reminder(&reminder))
            .await
    }

    async fn delete_all_reminders(&self) -> Result<()> {
        let deleted = self.with_storage(Storage::delete_all_reminders).await?;
        debug!("Repository cleared {} reminders", deleted);
        Ok(())
    }
}
