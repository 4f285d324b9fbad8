//! Binds a [`QuerySession`] and a [`RenderGate`] to the display collaborators.
//!
//! This is the only place where session outputs reach a map or status panel.

use crate::controller::{QueryResult, QuerySession};
use crate::display::{ClusterOptions, CountDisplay, MapView, StatusPanel};
use crate::error::{LoadFailure, Result};
use crate::events::{EventBus, SessionEvent, Subscription};
use crate::render_gate::{GateAction, RenderGate, RenderState};
use crate::status;
use pointradius_core::config::ConfigSchema;
use pointradius_geo::PointSet;
use std::cell::RefCell;
use std::rc::Rc;

/// Routes session events to state transitions and applies the results.
pub struct MapBinding<V, P> {
    session: QuerySession,
    gate: RenderGate,
    cluster_options: ClusterOptions,
    view: V,
    panel: P,
    markers_built: bool,
    last: Option<QueryResult>,
}

impl<V: MapView, P: StatusPanel> MapBinding<V, P> {
    pub fn new(session: QuerySession, cluster_options: ClusterOptions, view: V, panel: P) -> Self {
        let gate = RenderGate::new(session.min_zoom_for_points());
        Self {
            session,
            gate,
            cluster_options,
            view,
            panel,
            markers_built: false,
            last: None,
        }
    }

    /// Builds a binding from configuration.
    ///
    /// # Errors
    /// Returns an error if the configured defaults are invalid.
    pub fn from_config(schema: &ConfigSchema, view: V, panel: P) -> Result<Self> {
        let session = QuerySession::from_config(schema)?;
        Ok(Self::new(session, ClusterOptions::from(&schema.markers), view, panel))
    }

    pub fn session(&self) -> &QuerySession {
        &self.session
    }

    pub fn gate(&self) -> &RenderGate {
        &self.gate
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// The circle and count most recently pushed to the collaborators.
    pub fn last_result(&self) -> Option<&QueryResult> {
        self.last.as_ref()
    }

    /// Moves the view to the initial position, shows the loading state and
    /// draws the initial search circle.
    pub fn start(&mut self) {
        self.view.set_view(&self.session.initial_view());
        self.panel.set_status(status::LOADING);
        let result = self.session.recompute();
        self.view.render_circle(&result.circle);
        self.panel.set_radius_label(&result.radius_label);
        self.panel.set_count(CountDisplay::Pending);
        self.last = Some(result);
    }

    /// Applies one event.
    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::MapClicked { lat, lon } | SessionEvent::MarkerDragged { lat, lon } => {
                match self.session.set_center(lat, lon, false, self.view.zoom()) {
                    Ok(update) => self.show(update.result),
                    Err(e) => self.panel.set_status(&status::invalid_center(&e.to_string())),
                }
            }
            SessionEvent::ZoomChanged { zoom } => {
                // Nothing to gate until the marker collection exists.
                if self.markers_built {
                    self.apply_gate(zoom);
                }
            }
            SessionEvent::RadiusChanged { miles } => match self.session.set_radius(miles) {
                Ok(result) => self.show(result),
                Err(e) => {
                    self.panel.set_status(&status::invalid_radius(&e.to_string()));
                    self.panel.set_radius_label(&self.session.radius().label());
                }
            },
            SessionEvent::LocationRequested => {
                self.panel.set_status(status::REQUESTING_LOCATION);
            }
            SessionEvent::LocationResolved(Ok(point)) => {
                match self.session.set_center(point.lat, point.lon, true, self.view.zoom()) {
                    Ok(update) => {
                        self.panel.set_status(status::LOCATION_SET);
                        if let Some(request) = update.view {
                            self.view.set_view(&request);
                        }
                        self.show(update.result);
                    }
                    Err(e) => self.panel.set_status(&status::invalid_center(&e.to_string())),
                }
            }
            SessionEvent::LocationResolved(Err(e)) => {
                tracing::warn!(error = %e, "Geolocation failed");
                self.panel.set_status(e.status_message());
            }
            SessionEvent::PointsLoaded(result) => self.install_points(result),
        }
    }

    /// Subscribes a shared binding to a bus.
    pub fn attach(binding: &Rc<RefCell<Self>>, bus: &EventBus<SessionEvent>) -> Subscription
    where
        V: 'static,
        P: 'static,
    {
        let binding = Rc::clone(binding);
        bus.subscribe(move |event| binding.borrow_mut().handle(event.clone()))
    }

    fn install_points(&mut self, result: std::result::Result<PointSet, LoadFailure>) {
        if self.markers_built && self.gate.state() == RenderState::Shown {
            self.view.detach_markers();
        }
        self.gate.reset();

        let outcome = self.session.finish_load(result);

        if outcome.points.is_some() {
            self.view
                .build_markers(self.session.points().as_slice(), &self.cluster_options);
            self.markers_built = true;
            self.apply_gate(self.view.zoom());
        } else {
            self.markers_built = false;
        }

        self.panel.set_status(&outcome.status);
        self.show(outcome.result);
    }

    fn apply_gate(&mut self, zoom: f64) {
        let action = self.gate.evaluate(zoom);
        match action {
            GateAction::Attach => self.view.attach_markers(),
            GateAction::Detach => self.view.detach_markers(),
            GateAction::NoOp => return,
        }
        if let Some(message) = self.gate.status_message(action, zoom) {
            self.panel.set_status(&message);
        }
    }

    fn show(&mut self, result: QueryResult) {
        self.view.render_circle(&result.circle);
        self.panel.set_radius_label(&result.radius_label);
        self.panel.set_count(result.display);
        self.last = Some(result);
    }
}
