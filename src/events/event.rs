use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Identifies a hooked handler so it can be detached later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// A named list of handlers invoked synchronously on every trigger.
pub struct Event<T: ?Sized> {
    name: &'static str,
    handlers: RwLock<Vec<(HandlerId, Handler<T>)>>,
    next_id: AtomicU64,
    triggered: AtomicU64,
    last_triggered_at: Mutex<Option<DateTime<Utc>>>,
}

impl<T: ?Sized> Event<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
            triggered: AtomicU64::new(0),
            last_triggered_at: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registers a handler; it is called for every subsequent trigger.
    pub fn hook<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().push((id, Arc::new(handler)));
        id
    }

    /// Removes a handler. Returns false if it was not hooked.
    pub fn detach(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Calls every hooked handler with `payload`, in registration order.
    pub fn trigger(&self, payload: &T) {
        // snapshot so handlers may hook or detach without deadlocking
        let handlers: Vec<Handler<T>> = self
            .handlers
            .read()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        self.triggered.fetch_add(1, Ordering::Relaxed);
        *self.last_triggered_at.lock() = Some(Utc::now());

        trace!(event = self.name, handlers = handlers.len(), "Triggering event");
        for handler in handlers {
            handler(payload);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn stats(&self) -> EventStats {
        EventStats {
            name: self.name,
            handlers: self.handler_count(),
            triggered: self.triggered.load(Ordering::Relaxed),
            last_triggered_at: *self.last_triggered_at.lock(),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("handlers", &self.handler_count())
            .field("triggered", &self.triggered.load(Ordering::Relaxed))
            .finish()
    }
}

/// Trigger statistics of a single event
#[derive(Debug, Clone)]
pub struct EventStats {
    pub name: &'static str,
    pub handlers: usize,
    pub triggered: u64,
    pub last_triggered_at: Option<DateTime<Utc>>,
}
