//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Radius is negative, NaN or infinite
    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Point document is not valid JSON
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with pointradius-core error handling.
/// Matches the numeric values of `pointradius_core::ErrorCode`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Data document could not be parsed
    JsonParsing = 4002,
    /// Radius is negative, NaN or infinite
    InvalidRadius = 6002,
    /// Invalid coordinate values
    InvalidCoordinate = 6003,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidRadius(_) => GeoErrorCode::InvalidRadius,
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}
