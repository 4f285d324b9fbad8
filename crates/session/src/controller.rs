//! The query session: search center, radius and the resulting count.
//!
//! All methods are plain state transitions that return what the display
//! should show; nothing here talks to a collaborator. Every change is handled
//! the same way regardless of where it came from (click, drag, geolocation or
//! the radius input).

use crate::display::{CountDisplay, RadiusCircle, ViewRequest};
use crate::error::{LoadFailure, Result};
use crate::status;
use pointradius_core::config::{ConfigSchema, MapConfig};
use pointradius_geo::{GeoError, GeoPoint, PointSet, RadiusMiles, SpatialQueryEngine};
use pointradius_telemetry::{metrics, names};
use serde::Serialize;

/// Result of a recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub circle: RadiusCircle,
    /// Points inside the circle (0 while no data is loaded)
    pub count: usize,
    pub display: CountDisplay,
    pub radius_label: String,
}

/// Result of moving the search center.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterUpdate {
    /// Present when the view should follow the new center
    pub view: Option<ViewRequest>,
    pub result: QueryResult,
}

/// Result of installing the point data.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    /// Number of points loaded, `None` on failure
    pub points: Option<usize>,
    pub status: String,
    pub result: QueryResult,
}

/// Where the point data stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DataState {
    #[default]
    Loading,
    Ready(usize),
    Failed(String),
}

/// Owns the search center, the radius and the query engine.
#[derive(Debug)]
pub struct QuerySession {
    engine: SpatialQueryEngine,
    center: GeoPoint,
    radius: RadiusMiles,
    min_zoom_for_points: f64,
    initial_zoom: f64,
    data: DataState,
}

impl QuerySession {
    /// Creates a session over an empty point set.
    ///
    /// The initial view zoom is the configured default until
    /// [`QuerySession::with_initial_zoom`] overrides it.
    pub fn new(center: GeoPoint, radius: RadiusMiles, min_zoom_for_points: f64) -> Self {
        Self {
            engine: SpatialQueryEngine::new(),
            center,
            radius,
            min_zoom_for_points,
            initial_zoom: MapConfig::default().default_zoom,
            data: DataState::Loading,
        }
    }

    #[must_use]
    pub fn with_initial_zoom(mut self, zoom: f64) -> Self {
        self.initial_zoom = zoom;
        self
    }

    /// Creates a session from the configured defaults.
    ///
    /// # Errors
    /// Returns an error if the configured default radius is invalid.
    pub fn from_config(schema: &ConfigSchema) -> Result<Self> {
        let [lat, lon] = schema.map.default_center;
        let radius = RadiusMiles::new(schema.query.default_radius_miles)?;
        Ok(Self::new(
            GeoPoint::new(lat, lon),
            radius,
            schema.map.min_zoom_for_points,
        )
        .with_initial_zoom(schema.map.default_zoom))
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius(&self) -> RadiusMiles {
        self.radius
    }

    pub fn min_zoom_for_points(&self) -> f64 {
        self.min_zoom_for_points
    }

    /// Where the map should start: the search center at the initial zoom.
    pub fn initial_view(&self) -> ViewRequest {
        ViewRequest {
            center: self.center,
            zoom: self.initial_zoom,
        }
    }

    pub fn data_state(&self) -> &DataState {
        &self.data
    }

    pub fn points(&self) -> &PointSet {
        self.engine.points()
    }

    /// Moves the search center and recomputes.
    ///
    /// With `recenter_view`, also asks the view to center on the new point at
    /// `max(current_zoom, min_zoom_for_points)` so the markers become visible.
    ///
    /// # Errors
    /// Rejects NaN and infinite coordinates; the previous center stays.
    /// Longitudes past ±180 from a wrapped map are accepted as they are.
    pub fn set_center(
        &mut self,
        lat: f64,
        lon: f64,
        recenter_view: bool,
        current_zoom: f64,
    ) -> Result<CenterUpdate> {
        let center = GeoPoint::new(lat, lon);
        if !center.is_finite() {
            tracing::warn!(lat, lon, "Rejected non-finite center");
            return Err(GeoError::InvalidCoordinate(format!("({}, {}) is not a finite position", lat, lon)).into());
        }
        self.center = center;

        let view = recenter_view.then(|| ViewRequest {
            center: self.center,
            zoom: current_zoom.max(self.min_zoom_for_points),
        });

        Ok(CenterUpdate {
            view,
            result: self.recompute(),
        })
    }

    /// Changes the radius and recomputes.
    ///
    /// # Errors
    /// Rejects negative, NaN and infinite radii; the previous radius stays.
    pub fn set_radius(&mut self, miles: f64) -> Result<QueryResult> {
        self.radius = RadiusMiles::new(miles).inspect_err(|e| {
            tracing::warn!(miles, error = %e, "Rejected radius");
        })?;
        Ok(self.recompute())
    }

    /// Recomputes the circle and count for the current center and radius.
    pub fn recompute(&self) -> QueryResult {
        let radius_meters = self.radius.meters();
        let count = self.engine.count_within(&self.center, radius_meters);
        metrics().increment(names::QUERIES);

        tracing::debug!(
            lat = self.center.lat,
            lon = self.center.lon,
            radius_meters,
            count,
            "Recomputed radius count"
        );

        let display = match self.data {
            DataState::Failed(_) => CountDisplay::Error,
            _ => CountDisplay::Count(count),
        };

        QueryResult {
            circle: RadiusCircle {
                center: self.center,
                radius_meters,
            },
            count,
            display,
            radius_label: self.radius.label(),
        }
    }

    /// Installs the result of the point data load.
    ///
    /// On failure the point set is emptied and the count shows an error; the
    /// session remains usable.
    pub fn finish_load(&mut self, result: std::result::Result<PointSet, LoadFailure>) -> LoadOutcome {
        match result {
            Ok(points) => {
                let loaded = points.len();
                self.engine.load(points);
                self.data = DataState::Ready(loaded);
                metrics().increment(names::LOADS_OK);
                metrics().gauge(names::POINTS_LOADED, loaded as u64);

                LoadOutcome {
                    points: Some(loaded),
                    status: status::loaded(loaded),
                    result: self.recompute(),
                }
            }
            Err(failure) => {
                tracing::warn!(code = %failure.code, error = %failure, "Point data load failed");
                self.engine.load(PointSet::empty());
                self.data = DataState::Failed(failure.message.clone());
                metrics().increment(names::LOADS_FAILED);

                LoadOutcome {
                    points: None,
                    status: status::load_failed(&failure.message),
                    result: self.recompute(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;

    fn scenario_points() -> PointSet {
        PointSet::from_points([
            GeoPoint::new(45.0, -93.0),
            GeoPoint::new(46.0, -94.0),
            GeoPoint::new(0.0, 0.0),
        ])
    }

    fn session() -> QuerySession {
        QuerySession::new(
            GeoPoint::new(46.3, -94.2),
            RadiusMiles::new(25.0).unwrap(),
            10.0,
        )
    }

    #[test]
    fn test_fifty_mile_scenario() {
        let mut session = session();
        session.finish_load(Ok(scenario_points()));
        session.set_radius(50.0).unwrap();

        let update = session.set_center(45.0, -93.0, false, 6.0).unwrap();

        assert!(update.view.is_none());
        assert_eq!(update.result.count, 1);
        assert_eq!(update.result.display, CountDisplay::Count(1));
        assert!((update.result.circle.radius_meters - 80_467.2).abs() < 1e-6);
        assert_eq!(update.result.radius_label, "50.0");
    }

    #[test]
    fn test_recenter_zooms_in_to_threshold() {
        let mut session = session();

        let update = session.set_center(44.98, -93.27, true, 6.0).unwrap();
        let view = update.view.unwrap();
        assert_eq!(view.center, GeoPoint::new(44.98, -93.27));
        assert_eq!(view.zoom, 10.0);

        let update = session.set_center(44.98, -93.27, true, 15.0).unwrap();
        assert_eq!(update.view.unwrap().zoom, 15.0);
    }

    #[test]
    fn test_interaction_before_load_counts_zero() {
        let mut session = session();
        assert_eq!(session.data_state(), &DataState::Loading);

        let update = session.set_center(45.0, -93.0, false, 6.0).unwrap();
        assert_eq!(update.result.count, 0);
        assert_eq!(update.result.display, CountDisplay::Count(0));
    }

    #[test]
    fn test_zero_radius_counts_coincident_point() {
        let mut session = session();
        session.finish_load(Ok(scenario_points()));
        session.set_center(45.0, -93.0, false, 6.0).unwrap();

        let result = session.set_radius(0.0).unwrap();
        assert_eq!(result.count, 1);

        let update = session.set_center(45.1, -93.0, false, 6.0).unwrap();
        assert_eq!(update.result.count, 0);
    }

    #[test]
    fn test_invalid_radius_keeps_previous() {
        let mut session = session();
        let before = session.recompute();

        assert!(matches!(session.set_radius(-5.0), Err(SessionError::Geo(_))));
        assert!(session.set_radius(f64::NAN).is_err());

        assert_eq!(session.radius().miles(), 25.0);
        assert_eq!(session.recompute(), before);
    }

    #[test]
    fn test_non_finite_center_keeps_previous() {
        let mut session = session();
        session.finish_load(Ok(scenario_points()));
        session.set_radius(20_000.0).unwrap();
        session.set_center(45.0, -93.0, false, 6.0).unwrap();

        let err = session.set_center(f64::NAN, 0.0, true, 6.0).unwrap_err();
        assert_eq!(err.code(), pointradius_core::ErrorCode::InvalidCoordinate);
        assert!(session.set_center(0.0, f64::INFINITY, false, 6.0).is_err());

        assert_eq!(session.center(), GeoPoint::new(45.0, -93.0));
        assert_eq!(session.recompute().count, 3);
    }

    #[test]
    fn test_wrapped_longitude_is_accepted() {
        let mut session = session();
        session.finish_load(Ok(scenario_points()));
        session.set_radius(50.0).unwrap();

        // -453 is -93 after one wrap of the world
        let update = session.set_center(45.0, -453.0, false, 6.0).unwrap();
        assert_eq!(update.result.count, 1);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut session = session();
        session.finish_load(Ok(scenario_points()));
        session.set_center(45.5, -93.5, false, 6.0).unwrap();

        let first = session.recompute();
        let second = session.recompute();
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_success_outcome() {
        let mut session = session();
        let outcome = session.finish_load(Ok(scenario_points()));

        assert_eq!(outcome.points, Some(3));
        assert_eq!(outcome.status, "Loaded 3 points. Ready.");
        assert_eq!(session.data_state(), &DataState::Ready(3));
    }

    #[test]
    fn test_load_failure_outcome() {
        let mut session = session();
        let outcome = session.finish_load(Err(SessionError::Http { status: 404 }.into()));

        assert_eq!(outcome.points, None);
        assert_eq!(outcome.status, "Failed to load points: HTTP 404");
        assert_eq!(outcome.result.display, CountDisplay::Error);
        assert!(session.points().is_empty());

        // Still interactive. The count label keeps showing the error instead
        // of falling back to 0, so a failed load is not mistaken for an
        // empty area.
        let update = session.set_center(45.0, -93.0, false, 6.0).unwrap();
        assert_eq!(update.result.count, 0);
        assert_eq!(update.result.display, CountDisplay::Error);
    }

    #[test]
    fn test_from_config_defaults() {
        let session = QuerySession::from_config(&ConfigSchema::default()).unwrap();
        assert_eq!(session.center(), GeoPoint::new(46.3, -94.2));
        assert_eq!(session.radius().miles(), 25.0);
        assert_eq!(session.min_zoom_for_points(), 10.0);
        assert_eq!(
            session.initial_view(),
            ViewRequest {
                center: GeoPoint::new(46.3, -94.2),
                zoom: 6.0,
            }
        );
    }

    #[test]
    fn test_initial_zoom_from_config() {
        let config = pointradius_core::config::Config::from_toml_str("[map]\ndefault_zoom = 8.0").unwrap();
        let session = QuerySession::from_config(&config.schema).unwrap();
        assert_eq!(session.initial_view().zoom, 8.0);
    }

    #[test]
    fn test_from_config_rejects_bad_radius() {
        let mut schema = ConfigSchema::default();
        schema.query.default_radius_miles = f64::NAN;
        assert!(QuerySession::from_config(&schema).is_err());
    }
}
