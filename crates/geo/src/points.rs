//! Point data document parsing.
//!
//! The document is a JSON object with an `elements` array:
//!
//! ```json
//! { "elements": [ { "type": "node", "id": 1, "lat": 44.97, "lon": -93.26, "tags": {} } ] }
//! ```
//!
//! Only the numeric `lat`/`lon` pair of each element is kept. Elements without
//! both fields as JSON numbers are dropped without error.

use crate::{GeoPoint, Result};
use serde_json::Value;

/// An immutable, ordered set of points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    points: Vec<GeoPoint>,
}

impl PointSet {
    /// An empty set, used until the data load completes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a set from already-validated points.
    pub fn from_points(points: impl IntoIterator<Item = GeoPoint>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Builds a set from a parsed point document.
    ///
    /// A document without an `elements` array yields an empty set.
    ///
    /// # Example
    /// ```
    /// use pointradius_geo::{GeoPoint, PointSet};
    /// use serde_json::json;
    ///
    /// let doc = json!({"elements": [{"lat": "x", "lon": 5}, {"lat": 1, "lon": 2}]});
    /// let set = PointSet::from_document(&doc);
    /// assert_eq!(set.as_slice(), &[GeoPoint::new(1.0, 2.0)]);
    /// ```
    pub fn from_document(document: &Value) -> Self {
        let Some(elements) = document.get("elements").and_then(Value::as_array) else {
            tracing::debug!("Point document has no elements array");
            return Self::empty();
        };

        let points: Vec<GeoPoint> = elements.iter().filter_map(parse_element).collect();
        let dropped = elements.len() - points.len();
        if dropped > 0 {
            tracing::debug!(accepted = points.len(), dropped, "Dropped malformed point entries");
        }

        Self { points }
    }

    /// Parses a point document from JSON text.
    ///
    /// # Errors
    /// Returns [`crate::GeoError::JsonError`] if the text is not valid JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        Ok(Self::from_document(&document))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeoPoint> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[GeoPoint] {
        &self.points
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a GeoPoint;
    type IntoIter = std::slice::Iter<'a, GeoPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<GeoPoint> for PointSet {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}

#[inline]
fn parse_element(element: &Value) -> Option<GeoPoint> {
    let lat = element.get("lat")?.as_f64()?;
    let lon = element.get("lon")?.as_f64()?;
    Some(GeoPoint::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drops_non_numeric_entries() {
        let doc = json!({"elements": [{"lat": "x", "lon": 5}, {"lat": 1, "lon": 2}]});
        let set = PointSet::from_document(&doc);

        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0], GeoPoint::new(1.0, 2.0));
    }

    #[test]
    fn test_ignores_extra_fields() {
        let doc = json!({
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 42, "lat": 44.97, "lon": -93.26, "tags": {"surveillance": "camera"}}
            ]
        });
        let set = PointSet::from_document(&doc);
        assert_eq!(set.as_slice(), &[GeoPoint::new(44.97, -93.26)]);
    }

    #[test]
    fn test_drops_missing_null_and_non_object_entries() {
        let doc = json!({"elements": [
            null,
            42,
            "POINT(1 2)",
            {"lat": 1.0},
            {"lon": 1.0},
            {"lat": null, "lon": 2.0},
            {"lat": [1.0], "lon": 2.0},
            {"lat": 3.0, "lon": 4.0}
        ]});
        let set = PointSet::from_document(&doc);
        assert_eq!(set.as_slice(), &[GeoPoint::new(3.0, 4.0)]);
    }

    #[test]
    fn test_keeps_input_order() {
        let doc = json!({"elements": [
            {"lat": 3, "lon": 3},
            {"lat": 1, "lon": 1},
            {"lat": 2, "lon": 2}
        ]});
        let lats: Vec<f64> = PointSet::from_document(&doc).iter().map(|p| p.lat).collect();
        assert_eq!(lats, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_missing_elements_is_empty() {
        assert!(PointSet::from_document(&json!({})).is_empty());
        assert!(PointSet::from_document(&json!({"elements": null})).is_empty());
        assert!(PointSet::from_document(&json!({"elements": {"lat": 1, "lon": 2}})).is_empty());
        assert!(PointSet::from_document(&json!(null)).is_empty());
        assert!(PointSet::from_document(&json!([])).is_empty());
    }

    #[test]
    fn test_from_json_str() {
        let set = PointSet::from_json_str(r#"{"elements":[{"lat":45,"lon":-93}]}"#).unwrap();
        assert_eq!(set.len(), 1);

        assert!(PointSet::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_collect_into_point_set() {
        let set: PointSet = (0..3).map(|i| GeoPoint::new(f64::from(i), 0.0)).collect();
        assert_eq!(set.len(), 3);
        assert_eq!((&set).into_iter().count(), 3);
    }
}
