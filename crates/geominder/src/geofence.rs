//! Geofence monitoring.
//!
//! The monitor turns a stream of position fixes into reminder notifications.
//! It keeps one [`Geofence`] per stored reminder and remembers which fences
//! the last fix was inside, so only *enter* transitions produce a
//! notification. Each notification re-reads the reminder through the data
//! source, so a reminder removed since the last refresh is skipped.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::data::ReminderDataSource;
use crate::error::{Error, Result};
use crate::geo::Geofence;
use crate::reminder::{Coordinates, Reminder};

/// A reminder whose area the user just entered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderNotification {
    /// The reminder, as currently stored.
    pub reminder: Reminder,
    /// Distance from the fence center to the fix that triggered it.
    pub distance_meters: f64,
    /// When the transition was detected.
    pub triggered_at: DateTime<Utc>,
}

/// A cloneable stop switch for a running [`GeofenceMonitor`].
#[derive(Debug, Clone, Default)]
pub struct MonitorHandle {
    stop_signal: Arc<AtomicBool>,
}

impl MonitorHandle {
    /// Create a new monitor handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal the monitor to stop before handling its next fix.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }

    /// Reset the stop signal.
    pub fn reset(&self) {
        self.stop_signal.store(false, Ordering::SeqCst);
    }
}

/// Tracks position fixes against the stored reminders' geofences.
#[derive(Debug)]
pub struct GeofenceMonitor {
    data_source: Arc<dyn ReminderDataSource>,
    radius_meters: f64,
    notify_on_start: bool,
    fences: Vec<Geofence>,
    inside: HashSet<String>,
    last_position: Option<Coordinates>,
}

impl GeofenceMonitor {
    /// Create a monitor with no fences loaded yet; call [`Self::refresh`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRadius`] unless `radius_meters` is a positive,
    /// finite number.
    pub fn new(data_source: Arc<dyn ReminderDataSource>, radius_meters: f64) -> Result<Self> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(Error::InvalidRadius { radius_meters });
        }
        Ok(Self {
            data_source,
            radius_meters,
            notify_on_start: true,
            fences: Vec::new(),
            inside: HashSet::new(),
            last_position: None,
        })
    }

    /// Whether the first fix counts as entering the fences it falls in.
    #[must_use]
    pub fn with_notify_on_start(mut self, notify_on_start: bool) -> Self {
        self.notify_on_start = notify_on_start;
        self
    }

    /// Currently loaded fences.
    #[must_use]
    pub fn fences(&self) -> &[Geofence] {
        &self.fences
    }

    /// Rebuild the fences from the data source.
    ///
    /// Reminders with out-of-range coordinates get no fence. Returns the
    /// number of fences loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the reminders cannot be loaded; the previous
    /// fences are kept in that case.
    pub async fn refresh(&mut self) -> Result<usize> {
        let reminders = self.data_source.get_reminders().await?;

        self.fences = reminders
            .iter()
            .filter(|reminder| {
                let valid = reminder.coordinates().is_valid();
                if !valid {
                    warn!(
                        "Skipping geofence for reminder {} with invalid coordinates",
                        reminder.id()
                    );
                }
                valid
            })
            .map(|reminder| Geofence::for_reminder(reminder, self.radius_meters))
            .collect();

        let ids: HashSet<&str> = self.fences.iter().map(|f| f.request_id.as_str()).collect();
        self.inside.retain(|id| ids.contains(id.as_str()));

        info!("Monitoring {} geofences", self.fences.len());
        Ok(self.fences.len())
    }

    /// Record a fix and return the fences it newly entered, with distances.
    fn enter_transitions(&mut self, position: Coordinates) -> Vec<(String, f64)> {
        let first_fix = self.last_position.is_none();
        let mut entered = Vec::new();

        for fence in &self.fences {
            match fence.distance_if_inside(position) {
                Some(distance) => {
                    let newly = self.inside.insert(fence.request_id.clone());
                    if newly && (!first_fix || self.notify_on_start) {
                        entered.push((fence.request_id.clone(), distance));
                    }
                }
                None => {
                    self.inside.remove(&fence.request_id);
                }
            }
        }

        self.last_position = Some(position);
        entered
    }

    /// Process one position fix.
    ///
    /// Invalid fixes are ignored. Reminders that can no longer be read are
    /// skipped with a warning.
    pub async fn process(&mut self, position: Coordinates) -> Vec<ReminderNotification> {
        if !position.is_valid() {
            warn!("Ignoring invalid position fix {}", position);
            return Vec::new();
        }

        let entered = self.enter_transitions(position);
        let mut notifications = Vec::with_capacity(entered.len());

        for (id, distance_meters) in entered {
            match self.data_source.get_reminder(&id).await {
                Ok(reminder) => {
                    debug!("Entered geofence for reminder {}", id);
                    notifications.push(ReminderNotification {
                        reminder,
                        distance_meters,
                        triggered_at: Utc::now(),
                    });
                }
                Err(e) => warn!("Geofence {} triggered but reminder lookup failed: {e}", id),
            }
        }

        notifications
    }

    /// Consume fixes from `positions` and forward notifications.
    ///
    /// Loads the fences first, then runs until the position channel closes,
    /// the notification receiver is dropped, or `handle` is stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial fence load fails.
    pub async fn run(
        mut self,
        mut positions: mpsc::Receiver<Coordinates>,
        notifications: mpsc::Sender<ReminderNotification>,
        handle: MonitorHandle,
    ) -> Result<()> {
        self.refresh().await?;

        while let Some(position) = positions.recv().await {
            if handle.should_stop() {
                debug!("Geofence monitor stop requested");
                break;
            }
            for notification in self.process(position).await {
                if notifications.send(notification).await.is_err() {
                    debug!("Notification receiver dropped; stopping monitor");
                    return Ok(());
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryDataSource;

    /// ~55 m north of the origin.
    const NEAR: Coordinates = Coordinates {
        latitude: 0.0005,
        longitude: 0.0,
    };
    /// ~1.1 km north of the origin.
    const FAR: Coordinates = Coordinates {
        latitude: 0.01,
        longitude: 0.0,
    };

    fn at_origin(title: &str) -> Reminder {
        Reminder::new(
            Some(title.to_string()),
            None,
            Some("Origin".to_string()),
            0.0,
            0.0,
        )
    }

    async fn monitor_with(reminders: Vec<Reminder>) -> (Arc<InMemoryDataSource>, GeofenceMonitor) {
        let source = Arc::new(InMemoryDataSource::with_reminders(reminders));
        let mut monitor = GeofenceMonitor::new(source.clone(), 100.0).unwrap();
        monitor.refresh().await.unwrap();
        (source, monitor)
    }

    #[tokio::test]
    async fn test_refresh_builds_fences() {
        let bad = Reminder::new(None, None, None, 95.0, 0.0);
        let (_, monitor) = monitor_with(vec![at_origin("a"), bad]).await;
        assert_eq!(monitor.fences().len(), 1);
    }

    #[tokio::test]
    async fn test_enter_fires_once_until_exit() {
        let reminder = at_origin("Buy milk");
        let (_, mut monitor) = monitor_with(vec![reminder.clone()]).await;

        assert!(monitor.process(FAR).await.is_empty());

        let entered = monitor.process(NEAR).await;
        assert_eq!(entered.len(), 1);
        assert_eq!(entered[0].reminder, reminder);
        assert!(entered[0].distance_meters < 100.0);

        // Staying inside does not fire again.
        assert!(monitor.process(NEAR).await.is_empty());

        // Leaving and coming back does.
        assert!(monitor.process(FAR).await.is_empty());
        assert_eq!(monitor.process(NEAR).await.len(), 1);
    }

    #[tokio::test]
    async fn test_first_fix_inside_respects_notify_on_start() {
        let (_, monitor) = monitor_with(vec![at_origin("a")]).await;
        let mut quiet = monitor.with_notify_on_start(false);
        assert!(quiet.process(NEAR).await.is_empty());
        assert!(quiet.process(NEAR).await.is_empty());

        let (_, mut eager) = monitor_with(vec![at_origin("a")]).await;
        assert_eq!(eager.process(NEAR).await.len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_reminder_is_skipped() {
        let (source, mut monitor) = monitor_with(vec![at_origin("gone")]).await;
        source.delete_all_reminders().await.unwrap();

        assert!(monitor.process(NEAR).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_fix_is_ignored() {
        let (_, mut monitor) = monitor_with(vec![at_origin("a")]).await;
        assert!(monitor.process(Coordinates::new(f64::NAN, 0.0)).await.is_empty());
        // The bad fix did not count as the first fix.
        assert_eq!(monitor.process(NEAR).await.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_fences() {
        let (source, mut monitor) = monitor_with(vec![at_origin("a")]).await;
        source.set_return_error(true);

        assert!(monitor.refresh().await.is_err());
        assert_eq!(monitor.fences().len(), 1);
    }

    #[tokio::test]
    async fn test_run_forwards_notifications() {
        let reminder = at_origin("Run");
        let source = Arc::new(InMemoryDataSource::with_reminders(vec![reminder.clone()]));
        let monitor = GeofenceMonitor::new(source, 100.0).unwrap();
        let (pos_tx, pos_rx) = mpsc::channel(8);
        let (note_tx, mut note_rx) = mpsc::channel(8);

        let task = tokio::spawn(monitor.run(pos_rx, note_tx, MonitorHandle::new()));

        pos_tx.send(FAR).await.unwrap();
        pos_tx.send(NEAR).await.unwrap();
        drop(pos_tx);

        let notification = note_rx.recv().await.unwrap();
        assert_eq!(notification.reminder, reminder);
        assert!(note_rx.recv().await.is_none());
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_run_honours_stop_signal() {
        let source = Arc::new(InMemoryDataSource::with_reminders(vec![at_origin("a")]));
        let monitor = GeofenceMonitor::new(source, 100.0).unwrap();
        let (pos_tx, pos_rx) = mpsc::channel(8);
        let (note_tx, mut note_rx) = mpsc::channel(8);
        let handle = MonitorHandle::new();
        handle.stop();

        let task = tokio::spawn(monitor.run(pos_rx, note_tx, handle));
        pos_tx.send(NEAR).await.unwrap();

        task.await.unwrap().unwrap();
        assert!(note_rx.recv().await.is_none());
    }

    #[test]
    fn test_new_rejects_bad_radius() {
        let source: Arc<dyn ReminderDataSource> = Arc::new(InMemoryDataSource::new());
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = GeofenceMonitor::new(Arc::clone(&source), radius).unwrap_err();
            assert!(matches!(err, Error::InvalidRadius { .. }), "radius {radius}");
        }
        assert!(GeofenceMonitor::new(source, 0.5).is_ok());
    }

    #[test]
    fn test_monitor_handle_stop_and_reset() {
        let handle = MonitorHandle::new();
        let clone = handle.clone();
        assert!(!handle.should_stop());

        handle.stop();
        assert!(clone.should_stop());

        clone.reset();
        assert!(!handle.should_stop());
    }
}
