//! Session events and a single-threaded event bus.
//!
//! Handlers are registered explicitly and stay registered for as long as the
//! returned [`Subscription`] lives.

use crate::error::LoadFailure;
use crate::geolocation::GeolocationError;
use pointradius_geo::{GeoPoint, PointSet};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Everything the outside world can tell a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The map was clicked
    MapClicked { lat: f64, lon: f64 },
    /// The search marker was dropped after a drag
    MarkerDragged { lat: f64, lon: f64 },
    /// The map finished a zoom
    ZoomChanged { zoom: f64 },
    /// The radius input was committed
    RadiusChanged { miles: f64 },
    /// The user asked for their device location
    LocationRequested,
    LocationResolved(Result<GeoPoint, GeolocationError>),
    PointsLoaded(Result<PointSet, LoadFailure>),
}

type Handler<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Registry<E> {
    next_id: u64,
    handlers: Vec<(u64, Handler<E>)>,
}

trait Unsubscribe {
    fn remove(&mut self, id: u64);
}

impl<E> Unsubscribe for Registry<E> {
    fn remove(&mut self, id: u64) {
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
    }
}

/// Dispatches events to registered handlers in registration order.
pub struct EventBus<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Registers a handler until the returned subscription is dropped or disposed.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn subscribe(&self, handler: impl FnMut(&E) + 'static) -> Subscription {
        let handler: Handler<E> = Rc::new(RefCell::new(handler));
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, handler));

        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        Subscription { id, registry: weak }
    }

    /// Delivers an event to every handler registered at the time of the call.
    ///
    /// A handler that emits on the same bus does not receive its own nested
    /// event.
    pub fn emit(&self, event: &E) {
        let handlers: Vec<Handler<E>> = self
            .registry
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut handler) => (&mut *handler)(event),
                Err(_) => tracing::warn!("Skipped re-entrant event handler"),
            }
        }
    }

    pub fn handler_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

impl<E: 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a handler registered; unregisters it on [`Subscription::dispose`] or drop.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<dyn Unsubscribe>>,
}

impl Subscription {
    pub fn dispose(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.try_borrow_mut() {
                registry.remove(self.id);
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
