//! State for the reminder list screen.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::{BaseViewModel, NavigationCommand, Screen, ViewEvent};
use crate::data::ReminderDataSource;
use crate::reminder::Reminder;

/// What the list screen renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    /// Reminders from the last successful load.
    pub reminders: Vec<Reminder>,
    /// Show the empty-state placeholder instead of the list.
    pub show_no_data: bool,
}

/// Loads reminders for the list screen.
#[derive(Debug)]
pub struct RemindersListViewModel {
    base: BaseViewModel,
    data_source: Arc<dyn ReminderDataSource>,
    state: watch::Sender<ListState>,
}

impl RemindersListViewModel {
    /// Create a view-model reading from `data_source`.
    #[must_use]
    pub fn new(data_source: Arc<dyn ReminderDataSource>) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self {
            base: BaseViewModel::new(),
            data_source,
            state,
        }
    }

    /// Loading flag and one-shot events.
    #[must_use]
    pub fn base(&self) -> &BaseViewModel {
        &self.base
    }

    /// Observe list state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    /// Snapshot of the current list state.
    #[must_use]
    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    /// Reload reminders from the data source.
    ///
    /// The loading flag is raised for the duration of the fetch. On failure
    /// the error text is sent as a snackbar, the previous list is kept, and
    /// the empty-state placeholder is shown.
    pub async fn load_reminders(&self) {
        self.base.set_loading(true);
        let result = self.data_source.get_reminders().await;
        self.base.set_loading(false);

        match result {
            Ok(reminders) => {
                debug!("Loaded {} reminders", reminders.len());
                self.state.send_modify(|state| {
                    state.show_no_data = reminders.is_empty();
                    state.reminders = reminders;
                });
            }
            Err(e) => {
                warn!("Loading reminders failed: {e}");
                self.base.emit(ViewEvent::Snackbar(e.to_string()));
                self.state.send_modify(|state| state.show_no_data = true);
            }
        }
    }

    /// Ask the host to open the reminder editor.
    pub fn add_reminder(&self) {
        self.base
            .emit(ViewEvent::Navigate(NavigationCommand::To(Screen::SaveReminder)));
    }
}
