//! Geodesy and radius queries for pointradius.
//!
//! This crate provides:
//! - Haversine great-circle distance
//! - Mile/meter conversion and validated search radii
//! - Point document parsing into an immutable [`PointSet`]
//! - The brute-force [`SpatialQueryEngine`] radius count
//! - WASM bindings for stateless browser usage
//!
//! # Example
//!
//! ```
//! use pointradius_geo::{distance_meters, GeoPoint, PointSet, SpatialQueryEngine, miles_to_meters};
//!
//! let mut engine = SpatialQueryEngine::new();
//! engine.load(PointSet::from_points([
//!     GeoPoint::new(45.0, -93.0),
//!     GeoPoint::new(46.0, -94.0),
//!     GeoPoint::new(0.0, 0.0),
//! ]));
//!
//! let center = GeoPoint::new(45.0, -93.0);
//! assert_eq!(engine.count_within(&center, miles_to_meters(50.0)), 1);
//! assert_eq!(distance_meters(&center, &center), 0.0);
//! ```

mod error;
mod haversine;
pub mod points;
pub mod query;
pub mod units;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{distance_km, distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use points::PointSet;
pub use query::SpatialQueryEngine;
pub use units::{meters_to_miles, miles_to_meters, RadiusMiles, METERS_PER_MILE};

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees (-180 to 180)
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a new point.
    ///
    /// The range invariant is a precondition and is not checked here; use
    /// [`GeoPoint::is_valid`] when the source is untrusted.
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Creates a point from untrusted input, rejecting out-of-range values.
    ///
    /// # Errors
    /// Returns [`GeoError::InvalidCoordinate`] if either component is NaN or
    /// outside its degree range.
    pub fn checked(lat: f64, lon: f64) -> Result<Self> {
        let point = Self::new(lat, lon);
        if point.is_valid() {
            Ok(point)
        } else {
            Err(GeoError::InvalidCoordinate(format!("({}, {})", lat, lon)))
        }
    }

    /// Returns true if both components are inside their degree ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Returns true if neither component is NaN or infinite.
    ///
    /// Unlike [`GeoPoint::is_valid`] this accepts longitudes past ±180, which
    /// a wrapped map view reports.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.lat.to_radians(), self.lon.to_radians())
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let point = GeoPoint::new(46.3, -94.2);
        assert_eq!(point.lat, 46.3);
        assert_eq!(point.lon, -94.2);
    }

    #[test]
    fn test_point_validation() {
        assert!(GeoPoint::new(0.0, 0.0).is_valid());
        assert!(GeoPoint::new(90.0, 180.0).is_valid());
        assert!(GeoPoint::new(-90.0, -180.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_point_finiteness() {
        assert!(GeoPoint::new(45.0, -453.0).is_finite());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_finite());
        assert!(!GeoPoint::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_checked_point() {
        assert!(GeoPoint::checked(45.0, -93.0).is_ok());
        assert!(matches!(
            GeoPoint::checked(120.0, 0.0),
            Err(GeoError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_point_from_tuple() {
        let point: GeoPoint = (45.0, -93.0).into();
        assert_eq!(point, GeoPoint::new(45.0, -93.0));
    }
}
