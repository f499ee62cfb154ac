//! Repository façade over reminder storage.
//!
//! [`ReminderDataSource`] is the only storage contract the view-models and
//! the geofence monitor depend on. Two implementations ship with the crate:
//!
//! - [`LocalRepository`] persists through the `SQLite` DAO in
//!   [`crate::storage`].
//! - [`InMemoryDataSource`] keeps everything in process, for tests and
//!   embedders that don't need durability.
//!
//! Both behave identically: an unknown id is [`Error::NotFound`], listings
//! come back in insertion order, and saving an existing id replaces it.
//!
//! [`Error::NotFound`]: crate::error::Error::NotFound

mod local;
mod memory;

pub use local::LocalRepository;
pub use memory::{InMemoryDataSource, FORCED_ERROR_MESSAGE};

use async_trait::async_trait;

use crate::error::Result;
use crate::reminder::Reminder;

/// Asynchronous access to stored reminders.
///
/// There is deliberately no single-item delete; reminders are only removed
/// in bulk.
#[async_trait]
pub trait ReminderDataSource: Send + Sync + std::fmt::Debug {
    /// Fetch every reminder, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn get_reminders(&self) -> Result<Vec<Reminder>>;

    /// Fetch one reminder by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no reminder has this id, or a
    /// storage error if the store cannot be read.
    async fn get_reminder(&self, id: &str) -> Result<Reminder>;

    /// Insert or replace a reminder.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    async fn save_reminder(&self, reminder: &Reminder) -> Result<()>;

    /// Remove every reminder.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    async fn delete_all_reminders(&self) -> Result<()>;
}
