//! Radius membership queries over the loaded point set.
//!
//! Every query scans the whole set: O(n) per call. That stays interactive for
//! datasets up to tens of thousands of points; a grid or R-tree index belongs
//! here if the dataset grows well past that.

use crate::{distance_meters, GeoPoint, PointSet};

/// Owns the point set and answers radius queries against it.
#[derive(Debug, Clone, Default)]
pub struct SpatialQueryEngine {
    points: PointSet,
}

impl SpatialQueryEngine {
    /// Creates an engine over an empty point set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine over the given points.
    pub fn with_points(points: PointSet) -> Self {
        Self { points }
    }

    /// Replaces the point set.
    pub fn load(&mut self, points: PointSet) {
        tracing::info!(points = points.len(), "Point set loaded");
        self.points = points;
    }

    /// Parses a point document and replaces the point set with its entries.
    ///
    /// Returns the number of points kept.
    pub fn load_document(&mut self, document: &serde_json::Value) -> usize {
        self.load(PointSet::from_document(document));
        self.points.len()
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Counts points whose distance from `center` is at most `radius_meters`.
    ///
    /// The boundary is closed: a point exactly `radius_meters` away counts.
    /// A NaN radius or center matches nothing.
    pub fn count_within(&self, center: &GeoPoint, radius_meters: f64) -> usize {
        self.within(center, radius_meters).count()
    }

    /// Iterates the points inside the closed radius, in set order.
    pub fn within<'a>(
        &'a self,
        center: &'a GeoPoint,
        radius_meters: f64,
    ) -> impl Iterator<Item = &'a GeoPoint> + 'a {
        self.points
            .iter()
            .filter(move |p| distance_meters(center, p) <= radius_meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{miles_to_meters, EARTH_RADIUS_M};
    use proptest::prelude::*;

    fn scenario_engine() -> SpatialQueryEngine {
        SpatialQueryEngine::with_points(PointSet::from_points([
            GeoPoint::new(45.0, -93.0),
            GeoPoint::new(46.0, -94.0),
            GeoPoint::new(0.0, 0.0),
        ]))
    }

    #[test]
    fn test_fifty_mile_scenario() {
        let engine = scenario_engine();
        let center = GeoPoint::new(45.0, -93.0);
        let radius = miles_to_meters(50.0);

        assert!((radius - 80_467.2).abs() < 1e-6);
        assert_eq!(engine.count_within(&center, radius), 1);
    }

    #[test]
    fn test_empty_engine_counts_zero() {
        let engine = SpatialQueryEngine::new();
        assert_eq!(engine.count_within(&GeoPoint::new(45.0, -93.0), 1e9), 0);
    }

    #[test]
    fn test_closed_boundary() {
        let engine = scenario_engine();
        let center = GeoPoint::new(45.0, -93.0);
        let exact = distance_meters(&center, &GeoPoint::new(46.0, -94.0));

        // center itself plus the boundary point
        assert_eq!(engine.count_within(&center, exact), 2);
        // step just below the boundary distance
        let below = exact - exact * f64::EPSILON * 4.0;
        assert_eq!(engine.count_within(&center, below), 1);
    }

    #[test]
    fn test_point_beyond_radius_excluded() {
        let center = GeoPoint::new(0.0, 0.0);
        let one_degree = EARTH_RADIUS_M * 1.0_f64.to_radians();
        let engine = SpatialQueryEngine::with_points(PointSet::from_points([GeoPoint::new(1.0, 0.0)]));

        assert_eq!(engine.count_within(&center, one_degree + 1e-3), 1);
        assert_eq!(engine.count_within(&center, one_degree - 1e-3), 0);
    }

    #[test]
    fn test_zero_radius_counts_coincident_points() {
        let engine = scenario_engine();
        assert_eq!(engine.count_within(&GeoPoint::new(45.0, -93.0), 0.0), 1);
        assert_eq!(engine.count_within(&GeoPoint::new(45.0, -93.000_001), 0.0), 0);
    }

    #[test]
    fn test_nan_radius_matches_nothing() {
        let engine = scenario_engine();
        assert_eq!(engine.count_within(&GeoPoint::new(45.0, -93.0), f64::NAN), 0);
    }

    #[test]
    fn test_nan_center_matches_nothing() {
        let engine = scenario_engine();
        let center = GeoPoint::new(f64::NAN, 0.0);
        // larger than half the earth's circumference
        assert_eq!(engine.count_within(&center, 2.1e7), 0);
    }

    #[test]
    fn test_load_replaces_points() {
        let mut engine = scenario_engine();
        let kept = engine.load_document(&serde_json::json!({
            "elements": [{"lat": "x", "lon": 5}, {"lat": 1, "lon": 2}]
        }));

        assert_eq!(kept, 1);
        assert_eq!(engine.points().as_slice(), &[GeoPoint::new(1.0, 2.0)]);
    }

    #[test]
    fn test_within_yields_matching_points() {
        let engine = scenario_engine();
        let center = GeoPoint::new(45.5, -93.5);
        let found: Vec<_> = engine.within(&center, miles_to_meters(100.0)).copied().collect();
        assert_eq!(found, vec![GeoPoint::new(45.0, -93.0), GeoPoint::new(46.0, -94.0)]);
    }

    proptest! {
        #[test]
        fn prop_count_monotonic_in_radius(
            lat in -80.0..80.0f64,
            lon in -170.0..170.0f64,
            r1 in 0.0..5_000_000.0f64,
            r2 in 0.0..5_000_000.0f64,
        ) {
            let points: PointSet = (0..200)
                .map(|i| {
                    let f = f64::from(i);
                    GeoPoint::new((f * 7.3) % 170.0 - 85.0, (f * 13.7) % 350.0 - 175.0)
                })
                .collect();
            let engine = SpatialQueryEngine::with_points(points);
            let center = GeoPoint::new(lat, lon);
            let (small, large) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };

            prop_assert!(engine.count_within(&center, small) <= engine.count_within(&center, large));
        }
    }
}
