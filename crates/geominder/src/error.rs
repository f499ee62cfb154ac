//! Error types for geominder.
//!
//! Every fallible operation in the crate returns [`Error`]. Callers tell
//! failures apart by variant rather than by message text; the display text is
//! what the view-models surface to the user.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for geominder operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Lookup Errors ===
    /// No reminder exists with the requested identifier.
    #[error("Reminder not found!")]
    NotFound {
        /// The identifier that was looked up.
        id: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database statement failed.
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The store could not serve the request for a reason other than SQLite.
    #[error("storage unavailable: {message}")]
    StorageUnavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Geography Errors ===
    /// Latitude or longitude outside the valid range.
    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates {
        /// Supplied latitude in decimal degrees.
        latitude: f64,
        /// Supplied longitude in decimal degrees.
        longitude: f64,
    },

    /// Geofence radius that is not a positive, finite number of meters.
    #[error("invalid geofence radius: {radius_meters} m")]
    InvalidRadius {
        /// Supplied radius.
        radius_meters: f64,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for geominder operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a not-found error for the given reminder id.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a storage error that has no SQLite cause.
    #[must_use]
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means the requested reminder does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error originated in the store.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::StorageUnavailable { .. }
                | Self::DatabaseOpen { .. }
                | Self::DatabaseMigration { .. }
        )
    }
}
