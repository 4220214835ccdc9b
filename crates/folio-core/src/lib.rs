//! Core of the card-stack portfolio deck
//!
//! This crate holds the navigation state machine, the gesture interpreter and
//! the reveal/counter trigger, plus the timers and events that connect them.
//! Nothing here draws; rendering goes through [`surface::SlideSurface`].

pub mod config;
pub mod deck;
pub mod events;
pub mod gesture;
pub mod navigation;
pub mod page;
pub mod reveal;
pub mod stats;
pub mod surface;
pub mod timer;

// Re-export commonly used types
pub use config::{
    ConfigError, DeckConfig, GestureConfig, NavigationConfig, PageConfig, RevealConfig, StackStyle,
};
pub use deck::Deck;
pub use gesture::{GestureInterpreter, GestureOutcome, NavIntent};
pub use navigation::{
    CardRole, CardVisual, NavigationContext, NavigationEngine, NavigationSubscriber, Transition,
};
pub use page::{PageIndicators, ThemeMode, Tilt};
pub use reveal::{CounterAnimation, RevealTrigger};
pub use stats::{CounterTarget, StatsSource};
pub use surface::{RevealProbe, ScrollMetrics, SlideSurface};
