//! Configuration loading and schema definitions
//!
//! Session defaults, marker clustering and geolocation settings shared by
//! every host of the widget.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
