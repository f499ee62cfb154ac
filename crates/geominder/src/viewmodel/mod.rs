//! Screen state holders for reminder hosts.
//!
//! A view-model owns the state one screen renders and exposes it through
//! channels instead of mutable fields:
//!
//! - long-lived state (loading flag, list contents, the draft being edited)
//!   is a [`tokio::sync::watch`] channel, so a subscriber always sees the
//!   latest value;
//! - one-shot signals (snackbars, toasts, navigation) are [`ViewEvent`]s on a
//!   [`tokio::sync::broadcast`] channel, delivered once to every subscriber
//!   present when they fire.
//!
//! Dependencies are passed in through constructors; nothing is looked up
//! globally.

mod list;
mod save;

pub use list::{ListState, RemindersListViewModel};
pub use save::{DraftState, SaveReminderViewModel, ValidationError, REMINDER_SAVED_MESSAGE};

use tokio::sync::{broadcast, watch};
use tracing::trace;

/// How many undelivered events a slow subscriber may lag behind.
const EVENT_CAPACITY: usize = 32;

/// Screens a host can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// The list of saved reminders.
    ReminderList,
    /// The reminder editor.
    SaveReminder,
    /// The map picker.
    SelectLocation,
}

/// Navigation requests emitted by view-models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationCommand {
    /// Go to a screen.
    To(Screen),
    /// Go back one screen.
    Back,
}

/// One-shot signals for the host to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Show a transient message (usually an error).
    Snackbar(String),
    /// Show a transient validation message.
    ValidationFailed(ValidationError),
    /// Show a short confirmation.
    Toast(String),
    /// Change screens.
    Navigate(NavigationCommand),
}

/// Signals shared by every view-model.
#[derive(Debug)]
pub struct BaseViewModel {
    loading: watch::Sender<bool>,
    events: broadcast::Sender<ViewEvent>,
}

impl Default for BaseViewModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseViewModel {
    /// Create signals in the idle state.
    #[must_use]
    pub fn new() -> Self {
        let (loading, _) = watch::channel(false);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { loading, events }
    }

    /// Whether an operation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Observe the loading flag.
    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Receive events emitted from now on.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.loading.send_replace(loading);
    }

    pub(crate) fn emit(&self, event: ViewEvent) {
        if let Err(broadcast::error::SendError(event)) = self.events.send(event) {
            trace!("No subscribers for {:?}", event);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    use crate::data::{InMemoryDataSource, ReminderDataSource};
    use crate::error::Result;
    use crate::reminder::Reminder;

    /// Data source whose calls block until [`GatedDataSource::release`].
    #[derive(Debug)]
    pub(crate) struct GatedDataSource {
        pub(crate) inner: InMemoryDataSource,
        gate: Semaphore,
    }

    impl GatedDataSource {
        pub(crate) fn new() -> Self {
            Self {
                inner: InMemoryDataSource::new(),
                gate: Semaphore::new(0),
            }
        }

        pub(crate) fn release(&self) {
            self.gate.add_permits(1);
        }

        async fn pass(&self) {
            self.gate
                .acquire()
                .await
                .expect("gate semaphore closed")
                .forget();
        }
    }

    #[async_trait]
    impl ReminderDataSource for GatedDataSource {
        async fn get_reminders(&self) -> Result<Vec<Reminder>> {
            self.pass().await;
            self.inner.get_reminders().await
        }

        async fn get_reminder(&self, id: &str) -> Result<Reminder> {
            self.pass().await;
            self.inner.get_reminder(id).await
        }

        async fn save_reminder(&self, reminder: &Reminder) -> Result<()> {
            self.pass().await;
            self.inner.save_reminder(reminder).await
        }

        async fn delete_all_reminders(&self) -> Result<()> {
            self.pass().await;
            self.inner.delete_all_reminders().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_starts_idle() {
        let base = BaseViewModel::new();
        assert!(!base.is_loading());
    }

    #[test]
    fn test_set_loading_notifies_subscribers() {
        let base = BaseViewModel::new();
        let rx = base.subscribe_loading();

        base.set_loading(true);
        assert!(*rx.borrow());
        assert!(base.is_loading());

        base.set_loading(false);
        assert!(!*rx.borrow());
    }

    #[test]
    fn test_emit_without_subscribers_is_harmless() {
        let base = BaseViewModel::new();
        base.emit(ViewEvent::Toast("nobody listening".to_string()));
    }

    #[test]
    fn test_events_reach_every_subscriber() {
        let base = BaseViewModel::new();
        let mut a = base.subscribe_events();
        let mut b = base.subscribe_events();

        base.emit(ViewEvent::Navigate(NavigationCommand::Back));

        assert_eq!(
            a.try_recv().unwrap(),
            ViewEvent::Navigate(NavigationCommand::Back)
        );
        assert_eq!(
            b.try_recv().unwrap(),
            ViewEvent::Navigate(NavigationCommand::Back)
        );
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let base = BaseViewModel::new();
        base.emit(ViewEvent::Snackbar("early".to_string()));

        let mut late = base.subscribe_events();
        assert!(late.try_recv().is_err());
    }
}
