//! Core utilities for the pointradius workspace
//!
//! This crate provides functionality shared by the geo, session and
//! telemetry crates:
//!
//! - **Error handling**: errors with codes, context and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust
//! use pointradius_core::config::Config;
//!
//! let config = Config::from_toml_str("[map]\nmin_zoom_for_points = 11.0").unwrap();
//! assert_eq!(config.schema.map.min_zoom_for_points, 11.0);
//! assert_eq!(config.schema.geolocation.timeout_ms, 10_000);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, ErrorReport, Result, ResultExt};
