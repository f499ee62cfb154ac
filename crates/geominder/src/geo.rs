//! Distance and geofence geometry.
//!
//! Distances use the haversine formula on a spherical earth, which is
//! accurate to well under a percent at reminder-sized radii.

use serde::{Deserialize, Serialize};

use crate::reminder::{Coordinates, Reminder};

/// Mean earth radius in meters (IUGG).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Great-circle distance between two points, in meters.
#[must_use]
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// A circular region around a reminder's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    /// Identifier of the reminder this fence belongs to.
    pub request_id: String,
    /// Center of the fence.
    pub center: Coordinates,
    /// Radius in meters.
    pub radius_meters: f64,
}

impl Geofence {
    /// Create a geofence.
    #[must_use]
    pub fn new(request_id: impl Into<String>, center: Coordinates, radius_meters: f64) -> Self {
        Self {
            request_id: request_id.into(),
            center,
            radius_meters,
        }
    }

    /// Build the fence for a reminder.
    #[must_use]
    pub fn for_reminder(reminder: &Reminder, radius_meters: f64) -> Self {
        Self::new(reminder.id(), reminder.coordinates(), radius_meters)
    }

    /// Distance from the fence center to `point`, in meters.
    #[must_use]
    pub fn distance_to(&self, point: Coordinates) -> f64 {
        distance_meters(self.center, point)
    }

    /// Distance to `point` if it lies inside the fence (boundary inclusive).
    #[must_use]
    pub fn distance_if_inside(&self, point: Coordinates) -> Option<f64> {
        let distance = self.distance_to(point);
        (distance <= self.radius_meters).then_some(distance)
    }

    /// Whether `point` lies inside the fence.
    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        self.distance_if_inside(point).is_some()
    }
}
