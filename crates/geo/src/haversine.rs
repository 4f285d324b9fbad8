//! Haversine distance calculation.
//!
//! The haversine form stays accurate for small separations, where the
//! spherical law of cosines loses precision.

use crate::GeoPoint;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two points in meters.
///
/// Returns exactly `0.0` for identical points.
///
/// # Example
/// ```
/// use pointradius_geo::{distance_meters, GeoPoint};
///
/// let minneapolis = GeoPoint::new(44.9778, -93.2650);
/// let duluth = GeoPoint::new(46.7867, -92.1005);
///
/// let distance = distance_meters(&minneapolis, &duluth);
/// assert!((distance - 220_000.0).abs() < 3_000.0);
/// ```
#[inline]
pub fn distance_meters(from: &GeoPoint, to: &GeoPoint) -> f64 {
    distance_with_radius(from, to, EARTH_RADIUS_M)
}

/// Calculates the great-circle distance between two points in kilometers.
#[inline]
pub fn distance_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    distance_with_radius(from, to, EARTH_RADIUS_KM)
}

#[inline]
fn distance_with_radius(from: &GeoPoint, to: &GeoPoint, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push near-antipodal pairs just past 1. NaN must pass
    // through, which `f64::min` would not do.
    let a = if a > 1.0 { 1.0 } else { a };

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}
