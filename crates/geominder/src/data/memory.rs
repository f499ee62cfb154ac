//! In-process reminder store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::warn;

use super::ReminderDataSource;
use crate::error::{Error, Result};
use crate::reminder::Reminder;

/// Message used when reads are forced to fail.
pub const FORCED_ERROR_MESSAGE: &str = "Could not find Reminder item";

/// Insertion-ordered in-memory data source.
///
/// Reads can be forced to fail with [`InMemoryDataSource::set_return_error`]
/// to drive error paths in callers.
#[derive(Debug, Default)]
pub struct InMemoryDataSource {
    reminders: RwLock<Vec<Reminder>>,
    return_error: AtomicBool,
}

impl InMemoryDataSource {
    /// Create an empty data source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a data source pre-populated with `reminders`.
    ///
    /// Entries go through the same upsert as [`ReminderDataSource::save_reminder`]:
    /// a repeated id keeps its first position and takes the last value.
    /// Reminders with non-finite coordinates are dropped with a warning.
    #[must_use]
    pub fn with_reminders(reminders: Vec<Reminder>) -> Self {
        let mut stored = Vec::with_capacity(reminders.len());
        for reminder in reminders {
            match reminder.ensure_storable() {
                Ok(()) => upsert(&mut stored, reminder),
                Err(e) => warn!("Dropping reminder {}: {e}", reminder.id()),
            }
        }
        Self {
            reminders: RwLock::new(stored),
            return_error: AtomicBool::new(false),
        }
    }

    /// Make subsequent reads fail (`true`) or succeed again (`false`).
    pub fn set_return_error(&self, value: bool) {
        self.return_error.store(value, Ordering::SeqCst);
    }

    fn check_forced_error(&self) -> Result<()> {
        if self.return_error.load(Ordering::SeqCst) {
            Err(Error::storage_unavailable(FORCED_ERROR_MESSAGE))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReminderDataSource for InMemoryDataSource {
    async fn get_reminders(&self) -> Result<Vec<Reminder>> {
        self.check_forced_error()?;
        Ok(self.reminders.read().await.clone())
    }

    async fn get_reminder(&self, id: &str) -> Result<Reminder> {
        self.check_forced_error()?;
        self.reminders
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| Error::not_found(id))
    }

    async fn save_reminder(&self, reminder: &Reminder) -> Result<()> {
        reminder.ensure_storable()?;
        upsert(&mut *self.reminders.write().await, reminder.clone());
        Ok(())
    }

    async fn delete_all_reminders(&self) -> Result<()> {
        self.reminders.write().await.clear();
        Ok(())
    }
}

/// Replace the entry with the same id in place, or append.
fn upsert(reminders: &mut Vec<Reminder>, reminder: Reminder) {
    match reminders.iter_mut().find(|r| r.id() == reminder.id()) {
        Some(existing) => *existing = reminder,
        None => reminders.push(reminder),
    }
}
