//! Device geolocation: request options, failures and the native locator.
//!
//! A lookup is a one-shot operation with a fixed timeout and an allowance for
//! reusing a recent fix. It runs independently of the point data load, and a
//! failure only produces a status message.

use pointradius_core::config::GeolocationConfig;
use pointradius_core::ErrorCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Why a location lookup produced no position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GeolocationError {
    /// The host has no geolocation capability
    #[error("geolocation is not supported")]
    Unsupported,

    #[error("location permission denied")]
    PermissionDenied,

    #[error("location request timed out")]
    Timeout,

    /// The device could not determine a position
    #[error("location unavailable")]
    Unavailable,
}

impl GeolocationError {
    /// Maps a browser `GeolocationPositionError.code` onto a failure kind.
    ///
    /// 1 = permission denied, 2 = position unavailable, 3 = timeout; any
    /// other value is treated as unavailable.
    pub fn from_browser_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::Unavailable,
        }
    }

    /// Status line text shown to the user.
    pub fn status_message(&self) -> &'static str {
        match self {
            Self::Unsupported => "Geolocation not available in this browser.",
            _ => "Could not get location (permission denied or unavailable).",
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unsupported => ErrorCode::GeolocationUnsupported,
            Self::PermissionDenied => ErrorCode::GeolocationDenied,
            Self::Timeout => ErrorCode::GeolocationTimeout,
            Self::Unavailable => ErrorCode::GeolocationUnavailable,
        }
    }
}

/// Options for a single location request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    /// Give up after this long
    pub timeout: Duration,
    /// A cached fix younger than this is returned without asking the device
    pub maximum_age: Duration,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self::from(&GeolocationConfig::default())
    }
}

impl From<&GeolocationConfig> for GeolocationOptions {
    fn from(config: &GeolocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: Duration::from_millis(config.timeout_ms),
            maximum_age: Duration::from_millis(config.maximum_age_ms),
        }
    }
}

impl GeolocationOptions {
    /// The browser `PositionOptions` object for these options.
    pub fn position_options(&self) -> serde_json::Value {
        serde_json::json!({
            "enableHighAccuracy": self.high_accuracy,
            "timeout": u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            "maximumAge": u64::try_from(self.maximum_age.as_millis()).unwrap_or(u64::MAX),
        })
    }
}

#[cfg(feature = "native")]
pub use native::{Geolocator, PositionSource};

#[cfg(feature = "native")]
mod native {
    use super::{GeolocationError, GeolocationOptions};
    use pointradius_geo::GeoPoint;
    use pointradius_telemetry::{metrics, names};
    use std::future::Future;
    use std::time::Instant;

    /// Something that can produce the device position.
    pub trait PositionSource {
        fn current_position(
            &mut self,
            high_accuracy: bool,
        ) -> impl Future<Output = Result<GeoPoint, GeolocationError>>;
    }

    /// Runs location lookups with a timeout and a bounded-staleness cache.
    pub struct Geolocator<S> {
        source: S,
        options: GeolocationOptions,
        cached: Option<(GeoPoint, Instant)>,
    }

    impl<S: PositionSource> Geolocator<S> {
        pub fn new(source: S, options: GeolocationOptions) -> Self {
            Self {
                source,
                options,
                cached: None,
            }
        }

        pub fn options(&self) -> &GeolocationOptions {
            &self.options
        }

        pub fn source(&self) -> &S {
            &self.source
        }

        /// Resolves the device position once.
        ///
        /// # Errors
        /// Returns the source's failure, or [`GeolocationError::Timeout`] when
        /// the source does not answer within the configured timeout.
        pub async fn locate(&mut self) -> Result<GeoPoint, GeolocationError> {
            if let Some((point, at)) = self.cached {
                if at.elapsed() < self.options.maximum_age {
                    tracing::debug!("Using cached location fix");
                    return Ok(point);
                }
            }

            let lookup = self.source.current_position(self.options.high_accuracy);
            let result = match tokio::time::timeout(self.options.timeout, lookup).await {
                Ok(result) => result,
                Err(_) => Err(GeolocationError::Timeout),
            };

            match result {
                Ok(point) => {
                    self.cached = Some((point, Instant::now()));
                    Ok(point)
                }
                Err(e) => {
                    metrics().increment(names::GEOLOCATION_FAILED);
                    tracing::warn!(error = %e, "Location lookup failed");
                    Err(e)
                }
            }
        }
    }
}
