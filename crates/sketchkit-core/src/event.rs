//! Event notification plumbing for the sketch engine.
//!
//! Lifecycle notifications are dispatched synchronously through an
//! [`EventManager`]: handlers run in subscription order, on the calling
//! thread, before `publish` returns. Handlers are plain closures registered
//! once and compared by identity, so whatever was subscribed can always be
//! unsubscribed with the same `Rc`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::Point;
use uuid::Uuid;

use crate::stroke::StrokeStyle;

/// Typed payload slot carried by an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventParam {
    /// A single surface-local point.
    Point(Point),
    /// An ordered point sequence (a whole line).
    Points(Vec<Point>),
    /// A stroke style snapshot.
    Style(StrokeStyle),
    /// A boolean flag.
    Bool(bool),
}

impl EventParam {
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point(point) => Some(*point),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&[Point]> {
        match self {
            Self::Points(points) => Some(points),
            _ => None,
        }
    }

    pub fn as_style(&self) -> Option<&StrokeStyle> {
        match self {
            Self::Style(style) => Some(style),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }
}

/// A notification record handed to every subscribed handler.
///
/// Immutable apart from the propagation flag, which lets a handler cut the
/// dispatch short for the handlers queued after it.
#[derive(Debug, Clone)]
pub struct Event {
    name: String,
    target: Uuid,
    params: Vec<EventParam>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    fn new(name: &str, target: Uuid, params: Vec<EventParam>) -> Self {
        Self {
            name: name.to_string(),
            target,
            params,
            propagation_stopped: Cell::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The id of the engine that published the event.
    pub fn target(&self) -> Uuid {
        self.target
    }

    pub fn params(&self) -> &[EventParam] {
        &self.params
    }

    /// The parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&EventParam> {
        self.params.get(index)
    }

    /// Skip the remaining handlers for this dispatch.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// A subscribed event handler. Identity (`Rc::ptr_eq`) is what
/// [`EventManager::unsubscribe`] matches on, so handlers should be built
/// once and stored, not re-derived per call.
pub type Handler = Rc<dyn Fn(&Event)>;

/// Publish/subscribe hub keyed by event name.
#[derive(Default)]
pub struct EventManager {
    listeners: RefCell<HashMap<String, Vec<Handler>>>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to one event name, or to several given as a
    /// space-delimited list.
    pub fn subscribe(&self, names: &str, handler: Handler) {
        let mut listeners = self.listeners.borrow_mut();
        for name in names.split_whitespace() {
            listeners
                .entry(name.to_string())
                .or_default()
                .push(handler.clone());
        }
    }

    /// Remove a previously subscribed handler from each named list. Removing
    /// a handler that was never subscribed is a no-op, not an error.
    pub fn unsubscribe(&self, names: &str, handler: &Handler) {
        let mut listeners = self.listeners.borrow_mut();
        for name in names.split_whitespace() {
            if let Some(handlers) = listeners.get_mut(name) {
                handlers.retain(|registered| !Rc::ptr_eq(registered, handler));
            }
        }
    }

    /// Number of handlers currently subscribed to `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners
            .borrow()
            .get(name)
            .map_or(0, |handlers| handlers.len())
    }

    /// Dispatch to every handler subscribed to `name`, in subscription
    /// order. Returns `None` without building an [`Event`] when nothing is
    /// subscribed.
    ///
    /// Dispatch iterates a snapshot of the subscription list, so a handler
    /// may subscribe or unsubscribe freely; the change applies from the next
    /// publish. Ordering is only guaranteed within one name's handler list,
    /// never across names.
    pub fn publish(&self, name: &str, target: Uuid, params: Vec<EventParam>) -> Option<Event> {
        let handlers: Vec<Handler> = match self.listeners.borrow().get(name) {
            Some(handlers) if !handlers.is_empty() => handlers.clone(),
            _ => return None,
        };

        let event = Event::new(name, target, params);
        for handler in handlers {
            handler(&event);
            if event.propagation_stopped() {
                break;
            }
        }

        Some(event)
    }
}
