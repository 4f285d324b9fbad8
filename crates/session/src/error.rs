//! Error types for the session crate.

use crate::geolocation::GeolocationError;
use pointradius_core::ErrorCode;
use pointradius_geo::GeoError;
use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur while driving a query session.
///
/// None of these are fatal: the session stays interactive after any of them.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Point data request answered with a non-success status
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// Point data could not be fetched
    #[error("{0}")]
    DataLoad(String),

    /// Device location lookup failed
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    /// Invalid radius, coordinate or point document
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] pointradius_core::Error),

    /// Point data file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    /// Returns the workspace error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::Http { .. } => ErrorCode::HttpStatus,
            SessionError::DataLoad(_) => ErrorCode::DataLoadFailed,
            SessionError::Geolocation(e) => e.code(),
            SessionError::Geo(GeoError::InvalidRadius(_)) => ErrorCode::InvalidRadius,
            SessionError::Geo(GeoError::InvalidCoordinate(_)) => ErrorCode::InvalidCoordinate,
            SessionError::Geo(GeoError::JsonError(_)) => ErrorCode::DataParseError,
            SessionError::Config(e) => e.code,
            SessionError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            SessionError::Io(_) => ErrorCode::IoError,
        }
    }
}

impl From<SessionError> for pointradius_core::Error {
    fn from(err: SessionError) -> Self {
        let suggestion = match &err {
            SessionError::Config(_) => None,
            SessionError::Http { .. } | SessionError::DataLoad(_) | SessionError::Io(_) => {
                Some("Check that data.source points at a reachable point document")
            }
            SessionError::Geo(GeoError::JsonError(_)) => Some("The point document must be JSON with an elements array"),
            SessionError::Geolocation(GeolocationError::PermissionDenied) => {
                Some("Allow location access or click the map to set the center")
            }
            SessionError::Geolocation(_) | SessionError::Geo(_) => None,
        };

        match err {
            SessionError::Config(inner) => inner,
            other => {
                let core = pointradius_core::Error::new(other.code(), other.to_string());
                let core = match suggestion {
                    Some(text) => core.with_suggestion(text),
                    None => core,
                };
                core.with_source(other)
            }
        }
    }
}

/// A failed point data load, as delivered to the session.
///
/// Cloneable so it can travel inside [`crate::SessionEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoadFailure {
    pub code: ErrorCode,
    pub message: String,
}

impl LoadFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::DataLoadFailed,
            message: message.into(),
        }
    }
}

impl From<SessionError> for LoadFailure {
    fn from(err: SessionError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}
