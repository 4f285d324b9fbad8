//! Zoom-gated marker rendering.
//!
//! Attaching thousands of markers to a live view is expensive, so the marker
//! collection is only attached once the map is zoomed in past a threshold.
//! Points stay invisible when zoomed out; the gate trades that for a
//! responsive map.
//!
//! ```text
//!            zoom >= threshold / Attach
//!   Hidden ------------------------------> Shown
//!     ^                                      |
//!     +--------------------------------------+
//!            zoom < threshold / Detach
//! ```

use crate::status;
use pointradius_telemetry::{metrics, names};
use serde::Serialize;

/// Whether point markers are attached to the map view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RenderState {
    #[default]
    Hidden,
    Shown,
}

/// What the display should do with the marker collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateAction {
    Attach,
    Detach,
    NoOp,
}

/// Decides from the zoom level whether markers are shown.
#[derive(Debug, Clone)]
pub struct RenderGate {
    min_zoom: f64,
    state: RenderState,
}

impl RenderGate {
    /// Creates a gate in the `Hidden` state.
    pub fn new(min_zoom_for_points: f64) -> Self {
        Self {
            min_zoom: min_zoom_for_points,
            state: RenderState::Hidden,
        }
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Applies a zoom change and returns the resulting action.
    ///
    /// A NaN zoom never changes the state.
    pub fn evaluate(&mut self, zoom: f64) -> GateAction {
        let action = match self.state {
            RenderState::Hidden if zoom >= self.min_zoom => {
                self.state = RenderState::Shown;
                metrics().increment(names::GATE_ATTACH);
                GateAction::Attach
            }
            RenderState::Shown if zoom < self.min_zoom => {
                self.state = RenderState::Hidden;
                metrics().increment(names::GATE_DETACH);
                GateAction::Detach
            }
            _ => GateAction::NoOp,
        };

        if action != GateAction::NoOp {
            tracing::info!(zoom, ?action, state = ?self.state, "Render gate transition");
        }
        action
    }

    /// Forgets the current state, e.g. after the marker collection was rebuilt.
    pub fn reset(&mut self) {
        self.state = RenderState::Hidden;
    }

    /// Status line text for an action, if it warrants one.
    pub fn status_message(&self, action: GateAction, zoom: f64) -> Option<String> {
        match action {
            GateAction::Attach => Some(status::showing_points(zoom)),
            GateAction::Detach => Some(status::zoom_in_to_see(self.min_zoom)),
            GateAction::NoOp => None,
        }
    }
}

impl Default for RenderGate {
    fn default() -> Self {
        Self::new(10.0)
    }
}
