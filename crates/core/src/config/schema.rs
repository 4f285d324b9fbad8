//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub markers: MarkerConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub geolocation: GeolocationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check every section for values the session cannot work with.
    pub fn validate(&self) -> Result<()> {
        let [lat, lon] = self.map.default_center;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(Error::invalid_config_value(
                "map.default_center",
                format!("latitude {} is outside [-90, 90]", lat),
            ));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(Error::invalid_config_value(
                "map.default_center",
                format!("longitude {} is outside [-180, 180]", lon),
            ));
        }
        if !self.map.min_zoom_for_points.is_finite() || self.map.min_zoom_for_points < 0.0 {
            return Err(Error::invalid_config_value(
                "map.min_zoom_for_points",
                "must be a non-negative number",
            ));
        }
        if !self.query.default_radius_miles.is_finite() || self.query.default_radius_miles < 0.0 {
            return Err(Error::invalid_config_value(
                "query.default_radius_miles",
                "must be a non-negative number",
            ));
        }
        if self.geolocation.timeout_ms == 0 {
            return Err(Error::invalid_config_value(
                "geolocation.timeout_ms",
                "must be greater than zero",
            ));
        }
        if self.data.source.trim().is_empty() {
            return Err(Error::invalid_config_value("data.source", "must not be empty"));
        }
        Ok(())
    }
}

/// Map view defaults and the zoom gate threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial search center as `[lat, lon]`
    #[serde(default = "default_center")]
    pub default_center: [f64; 2],

    /// Initial map zoom
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,

    /// Point markers are attached at or above this zoom
    #[serde(default = "default_min_zoom_for_points")]
    pub min_zoom_for_points: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: default_center(),
            default_zoom: default_zoom(),
            min_zoom_for_points: default_min_zoom_for_points(),
        }
    }
}

fn default_center() -> [f64; 2] {
    [46.3, -94.2]
}

fn default_zoom() -> f64 {
    6.0
}

fn default_min_zoom_for_points() -> f64 {
    10.0
}

/// Radius query defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Radius used before the user touches the radius input
    #[serde(default = "default_radius_miles")]
    pub default_radius_miles: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_radius_miles: default_radius_miles(),
        }
    }
}

fn default_radius_miles() -> f64 {
    25.0
}

/// Marker cluster rendering options handed to the display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Clusters break into individual markers from this zoom on
    #[serde(default = "default_disable_clustering_at_zoom")]
    pub disable_clustering_at_zoom: f64,

    #[serde(default)]
    pub show_coverage_on_hover: bool,

    /// Build markers in chunks so the page stays responsive
    #[serde(default = "default_true")]
    pub chunked_loading: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            disable_clustering_at_zoom: default_disable_clustering_at_zoom(),
            show_coverage_on_hover: false,
            chunked_loading: true,
        }
    }
}

fn default_disable_clustering_at_zoom() -> f64 {
    14.0
}

fn default_true() -> bool {
    true
}

/// Point data source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// URL or file path of the point document
    #[serde(default = "default_source")]
    pub source: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
        }
    }
}

fn default_source() -> String {
    "./deflockPoints.json".to_string()
}

/// Device geolocation request options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default)]
    pub high_accuracy: bool,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Age up to which a cached fix is acceptable
    #[serde(default = "default_maximum_age_ms")]
    pub maximum_age_ms: u64,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: false,
            timeout_ms: default_timeout_ms(),
            maximum_age_ms: default_maximum_age_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_maximum_age_ms() -> u64 {
    60_000
}

/// Logging output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,

    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            show_target: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let schema = ConfigSchema::default();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.map.min_zoom_for_points, 10.0);
        assert_eq!(schema.geolocation.timeout_ms, 10_000);
        assert_eq!(schema.geolocation.maximum_age_ms, 60_000);
        assert!(!schema.geolocation.high_accuracy);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [map]
            min_zoom_for_points = 12.0

            [query]
            default_radius_miles = 50.0
            "#,
        )
        .unwrap();

        assert_eq!(schema.map.min_zoom_for_points, 12.0);
        assert_eq!(schema.map.default_center, [46.3, -94.2]);
        assert_eq!(schema.query.default_radius_miles, 50.0);
        assert_eq!(schema.markers.disable_clustering_at_zoom, 14.0);
        assert!(schema.markers.chunked_loading);
    }

    #[test]
    fn test_rejects_out_of_range_center() {
        let mut schema = ConfigSchema::default();
        schema.map.default_center = [95.0, 0.0];
        assert!(schema.validate().is_err());

        schema.map.default_center = [0.0, -190.0];
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_radius() {
        let mut schema = ConfigSchema::default();
        schema.query.default_radius_miles = -1.0;
        let err = schema.validate().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::InvalidConfigValue);
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut schema = ConfigSchema::default();
        schema.geolocation.timeout_ms = 0;
        assert!(schema.validate().is_err());
    }
}
