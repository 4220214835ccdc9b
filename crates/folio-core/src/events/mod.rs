use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Deck-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Events published by the deck
pub mod events {
    use super::Event;

    /// An accepted slide transition
    #[derive(Debug, Clone, PartialEq)]
    pub struct SlideChanged {
        pub from: usize,
        pub to: usize,
        pub slide_id: String,
    }

    /// An element scrolled into view for the first time
    #[derive(Debug, Clone, PartialEq)]
    pub struct ElementRevealed {
        pub slide: usize,
        pub element: String,
    }

    /// The session's counter animation started
    #[derive(Debug, Clone, PartialEq)]
    pub struct CounterStarted {
        pub slide: usize,
        pub counters: usize,
    }

    /// One counter reached its target
    #[derive(Debug, Clone, PartialEq)]
    pub struct CounterFinished {
        pub slide: usize,
        pub element: String,
        pub value: u64,
    }

    /// The statistics slide became active; counter targets are wanted
    #[derive(Debug, Clone, PartialEq)]
    pub struct StatsRequested {
        pub slide_id: String,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        SlideChanged,
        ElementRevealed,
        CounterStarted,
        CounterFinished,
        StatsRequested
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event
    ///
    /// Handlers run inline and must not publish on the same bus.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }

    /// Drop every handler
    pub fn clear(&self) {
        self.handlers.lock().clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

/// Create a handler that only sees events of type `E`
pub fn typed_handler<E, F>(mut f: F) -> Box<dyn EventHandler>
where
    E: Event,
    F: FnMut(&E) + Send + Sync + 'static,
{
    handler_from_fn(move |event| {
        if let Some(event) = event.as_any().downcast_ref::<E>() {
            f(event);
        }
    })
}
