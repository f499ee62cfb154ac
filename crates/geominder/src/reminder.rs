//! Core reminder types for geominder.
//!
//! A [`Reminder`] is a user-authored note pinned to a geographic point. The
//! map picker hands the save flow a [`PointOfInterest`]; both carry
//! [`Coordinates`] in decimal degrees.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, positive north of the equator.
    pub latitude: f64,
    /// Longitude, positive east of Greenwich.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair without range checks.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate pair, rejecting out-of-range or non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinates`] if the pair is not a point on earth.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coords = Self::new(latitude, longitude);
        if coords.is_valid() {
            Ok(coords)
        } else {
            Err(Error::InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }

    /// Check that latitude is within [-90, 90] and longitude within [-180, 180].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// A named location picked on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Where the place is.
    pub coordinates: Coordinates,
    /// Provider-specific place identifier.
    pub place_id: String,
    /// Human-readable place name, used as the reminder's location label.
    pub name: String,
}

impl PointOfInterest {
    /// Create a new point of interest.
    #[must_use]
    pub fn new(
        coordinates: Coordinates,
        place_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            coordinates,
            place_id: place_id.into(),
            name: name.into(),
        }
    }
}

/// A location-based reminder.
///
/// The identifier is generated on creation and cannot be changed afterwards.
/// Title and location label are optional here; requiring them is the save
/// flow's job, not the store's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    id: String,

    /// Short title shown in lists and notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Free-form details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Human-readable label of the place this reminder is tied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Reminder {
    /// Create a new reminder with a freshly generated identifier.
    #[must_use]
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        location: Option<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4().to_string(),
            title,
            description,
            location,
            latitude,
            longitude,
        )
    }

    /// Rebuild a reminder with a known identifier (used when reading from storage).
    #[must_use]
    pub fn with_id(
        id: impl Into<String>,
        title: Option<String>,
        description: Option<String>,
        location: Option<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title,
            description,
            location,
            latitude,
            longitude,
        }
    }

    /// The reminder's unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The reminder's position.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Check that both coordinates are finite numbers.
    ///
    /// Out-of-range but finite values are accepted; they just get no
    /// geofence. Every data source calls this before storing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinates`] for NaN or infinite values.
    pub fn ensure_storable(&self) -> Result<()> {
        if self.latitude.is_finite() && self.longitude.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Title to show to the user, falling back to the location label.
    #[must_use]
    pub fn display_title(&self) -> &str {
        non_blank(self.title.as_deref())
            .or_else(|| non_blank(self.location.as_deref()))
            .unwrap_or("Untitled reminder")
    }
}

/// Returns the string if it contains something other than whitespace.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
