//! `geominder` - Location-based reminders
//!
//! This library stores reminders pinned to geographic points in a local
//! `SQLite` database, exposes list and editor view-models over an async
//! data-source abstraction, and turns position fixes into reminder
//! notifications through geofences.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod geofence;
pub mod logging;
pub mod reminder;
pub mod storage;
pub mod viewmodel;

pub use config::Config;
pub use data::{InMemoryDataSource, LocalRepository, ReminderDataSource};
pub use error::{Error, Result};
pub use geo::Geofence;
pub use geofence::{GeofenceMonitor, MonitorHandle, ReminderNotification};
pub use logging::init_logging;
pub use reminder::{Coordinates, PointOfInterest, Reminder};
pub use storage::{Storage, StorageStats};
pub use viewmodel::{RemindersListViewModel, SaveReminderViewModel, ViewEvent};
