//! Card-stack navigation
//!
//! The engine owns the active index and the transition lock. Everything else
//! reads it through [`NavigationContext`] snapshots.

mod engine;
mod subscriber;
mod visual;

pub use engine::NavigationEngine;
pub use subscriber::NavigationSubscriber;
pub use visual::{card_visual, compute_visuals, CardRole, CardVisual};

/// An accepted slide change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    /// Time the cooldown ends
    pub unlock_at_ms: u64,
}

/// Snapshot of the navigation state handed to subscribers and readers
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationContext {
    /// Index of the active slide
    pub current_index: usize,

    /// Index that was active before the last accepted transition
    pub previous_index: Option<usize>,

    /// Number of slides in the deck
    pub slide_count: usize,

    /// Whether the cooldown is running
    pub locked: bool,

    /// Visual state of every slide, by ordinal
    pub visuals: Vec<CardVisual>,
}

impl NavigationContext {
    /// Whether the active slide is the first one
    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    /// Whether the active slide is the last one
    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.slide_count
    }
}
