//! State for the reminder editor.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use super::{BaseViewModel, NavigationCommand, Screen, ViewEvent};
use crate::data::ReminderDataSource;
use crate::reminder::{non_blank, PointOfInterest, Reminder};

/// Confirmation shown after a reminder is stored.
pub const REMINDER_SAVED_MESSAGE: &str = "Reminder Saved !";

/// Why a reminder was rejected before saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The title is missing or blank.
    #[error("Please enter title")]
    MissingTitle,
    /// No location has been selected.
    #[error("Please select location")]
    MissingLocation,
    /// The selected location's coordinates are not a point on earth.
    #[error("Please select a valid location")]
    InvalidLocation,
}

/// The reminder being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftState {
    /// Entered title.
    pub title: Option<String>,
    /// Entered description.
    pub description: Option<String>,
    /// Place picked on the map.
    pub selected_poi: Option<PointOfInterest>,
    /// Label shown for the picked place.
    pub location_label: Option<String>,
    /// Latitude of the picked place.
    pub latitude: Option<f64>,
    /// Longitude of the picked place.
    pub longitude: Option<f64>,
}

/// Validates and persists new reminders.
#[derive(Debug)]
pub struct SaveReminderViewModel {
    base: BaseViewModel,
    data_source: Arc<dyn ReminderDataSource>,
    draft: watch::Sender<DraftState>,
}

impl SaveReminderViewModel {
    /// Create a view-model writing to `data_source`.
    #[must_use]
    pub fn new(data_source: Arc<dyn ReminderDataSource>) -> Self {
        let (draft, _) = watch::channel(DraftState::default());
        Self {
            base: BaseViewModel::new(),
            data_source,
            draft,
        }
    }

    /// Loading flag and one-shot events.
    #[must_use]
    pub fn base(&self) -> &BaseViewModel {
        &self.base
    }

    /// Observe the draft.
    #[must_use]
    pub fn subscribe_draft(&self) -> watch::Receiver<DraftState> {
        self.draft.subscribe()
    }

    /// Snapshot of the draft.
    #[must_use]
    pub fn draft(&self) -> DraftState {
        self.draft.borrow().clone()
    }

    /// Set the draft title.
    pub fn set_title(&self, title: Option<String>) {
        self.draft.send_modify(|draft| draft.title = title);
    }

    /// Set the draft description.
    pub fn set_description(&self, description: Option<String>) {
        self.draft
            .send_modify(|draft| draft.description = description);
    }

    /// Record the place picked on the map.
    pub fn save_poi_location(&self, poi: PointOfInterest) {
        self.draft.send_modify(|draft| {
            draft.location_label = Some(poi.name.clone());
            draft.latitude = Some(poi.coordinates.latitude);
            draft.longitude = Some(poi.coordinates.longitude);
            draft.selected_poi = Some(poi);
        });
    }

    /// Ask the host to open the map picker.
    pub fn select_location(&self) {
        self.base
            .emit(ViewEvent::Navigate(NavigationCommand::To(Screen::SelectLocation)));
    }

    /// Reset the draft.
    pub fn on_clear(&self) {
        self.draft.send_replace(DraftState::default());
    }

    /// Build a new reminder from the current draft.
    ///
    /// Missing coordinates become `0.0`; such a draft has no location label
    /// and fails validation anyway.
    #[must_use]
    pub fn draft_reminder(&self) -> Reminder {
        let draft = self.draft.borrow();
        Reminder::new(
            draft.title.clone(),
            draft.description.clone(),
            draft.location_label.clone(),
            draft.latitude.unwrap_or_default(),
            draft.longitude.unwrap_or_default(),
        )
    }

    /// Check that a reminder has a title and a usable location.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: title, then location label, then
    /// coordinates.
    pub fn validate_entered_data(reminder: &Reminder) -> Result<(), ValidationError> {
        if non_blank(reminder.title.as_deref()).is_none() {
            return Err(ValidationError::MissingTitle);
        }
        if non_blank(reminder.location.as_deref()).is_none() {
            return Err(ValidationError::MissingLocation);
        }
        if !reminder.coordinates().is_valid() {
            return Err(ValidationError::InvalidLocation);
        }
        Ok(())
    }

    /// Validate `reminder` and save it if it passes.
    ///
    /// A rejected reminder emits [`ViewEvent::ValidationFailed`] and leaves
    /// the draft untouched. Returns whether the reminder was stored.
    pub async fn validate_and_save_reminder(&self, reminder: &Reminder) -> bool {
        match Self::validate_entered_data(reminder) {
            Ok(()) => self.save_reminder(reminder).await,
            Err(err) => {
                self.base.emit(ViewEvent::ValidationFailed(err));
                false
            }
        }
    }

    /// Persist `reminder` without validation.
    ///
    /// On success emits a confirmation toast followed by a back navigation.
    /// On failure emits the error text as a snackbar and stays put. Returns
    /// whether the reminder was stored.
    pub async fn save_reminder(&self, reminder: &Reminder) -> bool {
        self.base.set_loading(true);
        let result = self.data_source.save_reminder(reminder).await;
        self.base.set_loading(false);

        match result {
            Ok(()) => {
                info!("Saved reminder {}", reminder.id());
                self.base
                    .emit(ViewEvent::Toast(REMINDER_SAVED_MESSAGE.to_string()));
                self.base
                    .emit(ViewEvent::Navigate(NavigationCommand::Back));
                true
            }
            Err(e) => {
                warn!("Saving reminder {} failed: {e}", reminder.id());
                self.base.emit(ViewEvent::Snackbar(e.to_string()));
                false
            }
        }
    }
}
