//! WASM bindings for the geo crate.
//!
//! Stateless helpers for JavaScript callers; the stateful widget session lives
//! in `pointradius-session`.

use crate::{distance_meters as haversine_meters, miles_to_meters, GeoPoint, PointSet, SpatialQueryEngine};
use wasm_bindgen::prelude::*;

/// Great-circle distance between two coordinates in meters.
#[wasm_bindgen(js_name = distanceMeters)]
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_meters(&GeoPoint::new(lat1, lon1), &GeoPoint::new(lat2, lon2))
}

/// Converts miles to meters using the international mile.
#[wasm_bindgen(js_name = milesToMeters)]
pub fn miles_to_meters_js(miles: f64) -> f64 {
    miles_to_meters(miles)
}

/// Counts the points of a point document within a radius.
///
/// # Arguments
/// * `lat` - Center latitude
/// * `lon` - Center longitude
/// * `radius_meters` - Closed radius in meters
/// * `document_json` - JSON text of the point document (`{"elements": [...]}`)
#[wasm_bindgen(js_name = countWithin)]
pub fn count_within(lat: f64, lon: f64, radius_meters: f64, document_json: &str) -> Result<u32, JsValue> {
    let points = PointSet::from_json_str(document_json)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let engine = SpatialQueryEngine::with_points(points);
    let count = engine.count_within(&GeoPoint::new(lat, lon), radius_meters);

    u32::try_from(count).map_err(|_| JsValue::from_str("count exceeds u32"))
}
