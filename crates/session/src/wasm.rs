//! WASM bindings for driving a session from a browser page.
//!
//! The page owns the map library and the DOM. It hands in one object that
//! implements the display methods below and forwards its UI events to
//! [`WasmSession`].

use crate::binding::MapBinding;
use crate::display::{ClusterOptions, CountDisplay, MapView, RadiusCircle, StatusPanel, ViewRequest};
use crate::error::{LoadFailure, SessionError};
use crate::events::SessionEvent;
use crate::geolocation::{GeolocationError, GeolocationOptions};
use pointradius_core::config::Config;
use pointradius_geo::{GeoPoint, PointSet};
use pointradius_telemetry::metrics;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// The page-side display object.
    ///
    /// Expected methods: `getZoom()`, `setView(lat, lon, zoom)`,
    /// `attachMarkers()`, `detachMarkers()`, `renderCircle(lat, lon, radiusMeters)`,
    /// `buildMarkers(pointsJson, optionsJson)`, `setStatus(text)`,
    /// `setCount(text)` and `setRadiusLabel(text)`.
    #[wasm_bindgen(extends = js_sys::Object)]
    #[derive(Debug, Clone)]
    pub type HostDisplay;

    #[wasm_bindgen(method, js_name = getZoom)]
    fn get_zoom(this: &HostDisplay) -> f64;

    #[wasm_bindgen(method, js_name = setView)]
    fn js_set_view(this: &HostDisplay, lat: f64, lon: f64, zoom: f64);

    #[wasm_bindgen(method, js_name = attachMarkers)]
    fn js_attach_markers(this: &HostDisplay);

    #[wasm_bindgen(method, js_name = detachMarkers)]
    fn js_detach_markers(this: &HostDisplay);

    #[wasm_bindgen(method, js_name = renderCircle)]
    fn js_render_circle(this: &HostDisplay, lat: f64, lon: f64, radius_meters: f64);

    #[wasm_bindgen(method, js_name = buildMarkers)]
    fn js_build_markers(this: &HostDisplay, points_json: &str, options_json: &str);

    #[wasm_bindgen(method, js_name = setStatus)]
    fn js_set_status(this: &HostDisplay, text: &str);

    #[wasm_bindgen(method, js_name = setCount)]
    fn js_set_count(this: &HostDisplay, text: &str);

    #[wasm_bindgen(method, js_name = setRadiusLabel)]
    fn js_set_radius_label(this: &HostDisplay, text: &str);
}

impl MapView for HostDisplay {
    fn zoom(&self) -> f64 {
        self.get_zoom()
    }

    fn set_view(&mut self, request: &ViewRequest) {
        self.js_set_view(request.center.lat, request.center.lon, request.zoom);
    }

    fn attach_markers(&mut self) {
        self.js_attach_markers();
    }

    fn detach_markers(&mut self) {
        self.js_detach_markers();
    }

    fn render_circle(&mut self, circle: &RadiusCircle) {
        self.js_render_circle(circle.center.lat, circle.center.lon, circle.radius_meters);
    }

    fn build_markers(&mut self, points: &[GeoPoint], options: &ClusterOptions) {
        let points_json = serde_json::to_string(points).unwrap_or_else(|_| "[]".to_string());
        let options_json = serde_json::to_string(options).unwrap_or_else(|_| "{}".to_string());
        self.js_build_markers(&points_json, &options_json);
    }
}

impl StatusPanel for HostDisplay {
    fn set_status(&mut self, text: &str) {
        self.js_set_status(text);
    }

    fn set_count(&mut self, count: CountDisplay) {
        self.js_set_count(&count.to_string());
    }

    fn set_radius_label(&mut self, label: &str) {
        self.js_set_radius_label(label);
    }
}

/// A JS `Error` with the serialised error report attached as `report`.
fn to_js_error(err: impl Into<pointradius_core::Error>) -> JsValue {
    let err = err.into();
    let js_error = js_sys::Error::new(&err.message);
    if let Ok(report) = serde_json::to_string(&err.to_report()) {
        let _ = js_sys::Reflect::set(&js_error, &JsValue::from_str("report"), &JsValue::from_str(&report));
    }
    js_error.into()
}

/// A radius query session bound to a page display.
#[wasm_bindgen]
pub struct WasmSession {
    binding: MapBinding<HostDisplay, HostDisplay>,
    geolocation: GeolocationOptions,
    data_source: String,
}

#[wasm_bindgen]
impl WasmSession {
    /// Creates a session; `config_toml` overrides the built-in defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(display: HostDisplay, config_toml: Option<String>) -> Result<WasmSession, JsValue> {
        let config = match config_toml {
            Some(text) => Config::from_toml_str(&text).map_err(to_js_error)?,
            None => Config::default(),
        };
        let schema = &config.schema;

        // A second session on the same page keeps the first subscriber.
        if let Err(e) = pointradius_telemetry::init_console(&schema.logging) {
            tracing::debug!(error = %e, "Console logging already initialized");
        }

        let binding = MapBinding::from_config(schema, display.clone(), display).map_err(to_js_error)?;

        Ok(WasmSession {
            binding,
            geolocation: GeolocationOptions::from(&schema.geolocation),
            data_source: schema.data.source.clone(),
        })
    }

    /// Shows the loading state and the initial circle.
    pub fn start(&mut self) {
        self.binding.start();
    }

    #[wasm_bindgen(js_name = mapClicked)]
    pub fn map_clicked(&mut self, lat: f64, lon: f64) {
        self.binding.handle(SessionEvent::MapClicked { lat, lon });
    }

    #[wasm_bindgen(js_name = markerDragged)]
    pub fn marker_dragged(&mut self, lat: f64, lon: f64) {
        self.binding.handle(SessionEvent::MarkerDragged { lat, lon });
    }

    #[wasm_bindgen(js_name = zoomChanged)]
    pub fn zoom_changed(&mut self, zoom: f64) {
        self.binding.handle(SessionEvent::ZoomChanged { zoom });
    }

    /// Applies the committed radius input; rejected values keep the old radius.
    #[wasm_bindgen(js_name = radiusChanged)]
    pub fn radius_changed(&mut self, miles: f64) {
        self.binding.handle(SessionEvent::RadiusChanged { miles });
    }

    #[wasm_bindgen(js_name = locationRequested)]
    pub fn location_requested(&mut self) {
        self.binding.handle(SessionEvent::LocationRequested);
    }

    #[wasm_bindgen(js_name = locationResolved)]
    pub fn location_resolved(&mut self, lat: f64, lon: f64) {
        let result = GeoPoint::checked(lat, lon).map_err(|_| GeolocationError::Unavailable);
        self.binding.handle(SessionEvent::LocationResolved(result));
    }

    /// Reports a failed lookup; `0` means the browser has no geolocation.
    #[wasm_bindgen(js_name = locationFailed)]
    pub fn location_failed(&mut self, code: u16) {
        let error = match code {
            0 => GeolocationError::Unsupported,
            other => GeolocationError::from_browser_code(other),
        };
        self.binding.handle(SessionEvent::LocationResolved(Err(error)));
    }

    /// Installs the fetched point document.
    #[wasm_bindgen(js_name = pointsLoaded)]
    pub fn points_loaded(&mut self, document_json: &str) {
        let result = PointSet::from_json_str(document_json)
            .map_err(|e| LoadFailure::from(SessionError::from(e)));
        self.binding.handle(SessionEvent::PointsLoaded(result));
    }

    /// Reports a non-success HTTP response for the point document.
    #[wasm_bindgen(js_name = pointsHttpStatus)]
    pub fn points_http_status(&mut self, status: u16) {
        let failure = LoadFailure::from(SessionError::Http { status });
        self.binding.handle(SessionEvent::PointsLoaded(Err(failure)));
    }

    #[wasm_bindgen(js_name = pointsFailed)]
    pub fn points_failed(&mut self, message: &str) {
        self.binding
            .handle(SessionEvent::PointsLoaded(Err(LoadFailure::new(message))));
    }

    /// Options for `navigator.geolocation.getCurrentPosition`, as JSON.
    #[wasm_bindgen(js_name = geolocationOptions)]
    pub fn geolocation_options(&self) -> String {
        self.geolocation.position_options().to_string()
    }

    /// Where the page should fetch the point document from.
    #[wasm_bindgen(js_name = dataSource)]
    pub fn data_source(&self) -> String {
        self.data_source.clone()
    }

    /// Number of points inside the circle as last shown, 0 before `start`.
    pub fn count(&self) -> usize {
        self.binding.last_result().map_or(0, |result| result.count)
    }

    /// Counters, gauges and load durations as JSON.
    #[wasm_bindgen(js_name = metricsJson)]
    pub fn metrics_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&metrics().snapshot()).map_err(|e| to_js_error(pointradius_core::Error::from(e)))
    }
}
