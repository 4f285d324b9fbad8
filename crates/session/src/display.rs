//! Display and UI collaborators.
//!
//! The session never touches a map library or DOM directly. Hosts implement
//! [`MapView`] and [`StatusPanel`]; visual layout may complete asynchronously
//! on their side.

use pointradius_core::config::MarkerConfig;
use pointradius_geo::GeoPoint;
use serde::Serialize;
use std::fmt;

/// The circle overlay describing the current query area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusCircle {
    pub center: GeoPoint,
    pub radius_meters: f64,
}

/// A request to move the map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewRequest {
    pub center: GeoPoint,
    pub zoom: f64,
}

/// Marker clustering options passed along when markers are built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOptions {
    pub disable_clustering_at_zoom: f64,
    pub show_coverage_on_hover: bool,
    pub chunked_loading: bool,
}

impl From<&MarkerConfig> for ClusterOptions {
    fn from(config: &MarkerConfig) -> Self {
        Self {
            disable_clustering_at_zoom: config.disable_clustering_at_zoom,
            show_coverage_on_hover: config.show_coverage_on_hover,
            chunked_loading: config.chunked_loading,
        }
    }
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self::from(&MarkerConfig::default())
    }
}

/// What the count label shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CountDisplay {
    /// Nothing computed yet
    Pending,
    Count(usize),
    /// The point data failed to load
    Error,
}

impl fmt::Display for CountDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountDisplay::Pending => write!(f, "…"),
            CountDisplay::Count(n) => write!(f, "{}", n),
            CountDisplay::Error => write!(f, "Error"),
        }
    }
}

/// The map rendering collaborator.
pub trait MapView {
    /// Current zoom level.
    fn zoom(&self) -> f64;

    fn set_view(&mut self, request: &ViewRequest);

    /// Adds the marker collection to the map.
    fn attach_markers(&mut self);

    /// Removes the marker collection from the map.
    fn detach_markers(&mut self);

    fn render_circle(&mut self, circle: &RadiusCircle);

    /// Builds the (detached) marker collection for the loaded points.
    fn build_markers(&mut self, points: &[GeoPoint], options: &ClusterOptions);
}

/// The text outputs next to the map.
pub trait StatusPanel {
    fn set_status(&mut self, text: &str);
    fn set_count(&mut self, count: CountDisplay);
    fn set_radius_label(&mut self, label: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_display_text() {
        assert_eq!(CountDisplay::Count(17).to_string(), "17");
        assert_eq!(CountDisplay::Error.to_string(), "Error");
    }

    #[test]
    fn test_cluster_options_json() {
        let json = serde_json::to_value(ClusterOptions::default()).unwrap();
        assert_eq!(json["disableClusteringAtZoom"], 14.0);
        assert_eq!(json["showCoverageOnHover"], false);
        assert_eq!(json["chunkedLoading"], true);
    }
}
