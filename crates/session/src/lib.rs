//! Pointradius Session
//!
//! The interactive side of the radius widget: a search center and radius,
//! the count of points inside the circle, and the zoom gate that decides
//! when individual markers are shown.
//!
//! State transitions live in [`QuerySession`] and [`RenderGate`] and never
//! touch a map or DOM. [`MapBinding`] connects them to host collaborators
//! through the [`MapView`] and [`StatusPanel`] traits.
//!
//! # Example
//!
//! ```
//! use pointradius_geo::{GeoPoint, PointSet, RadiusMiles};
//! use pointradius_session::QuerySession;
//!
//! let mut session = QuerySession::new(GeoPoint::new(46.3, -94.2), RadiusMiles::new(50.0).unwrap(), 10.0);
//! session.finish_load(Ok(PointSet::from_points([
//!     GeoPoint::new(45.0, -93.0),
//!     GeoPoint::new(46.0, -94.0),
//! ])));
//!
//! let update = session.set_center(45.0, -93.0, false, 6.0).unwrap();
//! assert_eq!(update.result.count, 1);
//! ```

pub mod binding;
pub mod controller;
pub mod display;
pub mod error;
pub mod events;
pub mod geolocation;
pub mod render_gate;
pub mod status;

#[cfg(feature = "native")]
pub mod loader;

#[cfg(feature = "wasm")]
mod wasm;

pub use binding::MapBinding;
pub use controller::{CenterUpdate, DataState, LoadOutcome, QueryResult, QuerySession};
pub use display::{ClusterOptions, CountDisplay, MapView, RadiusCircle, StatusPanel, ViewRequest};
pub use error::{LoadFailure, Result, SessionError};
pub use events::{EventBus, SessionEvent, Subscription};
pub use geolocation::{GeolocationError, GeolocationOptions};
pub use render_gate::{GateAction, RenderGate, RenderState};

#[cfg(feature = "native")]
pub use geolocation::{Geolocator, PositionSource};
#[cfg(feature = "native")]
pub use loader::{load_points, PointSource};
