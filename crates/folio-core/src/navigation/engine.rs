//! Navigation engine implementation

use super::{compute_visuals, CardVisual, NavigationContext, NavigationSubscriber, Transition};
use crate::config::StackStyle;
use crate::timer::CooldownTimer;
use std::sync::{Arc, Weak};
use parking_lot::RwLock;
use tracing::debug;

/// Navigation state stored internally
#[derive(Debug, Clone)]
struct NavigationState {
    current_index: usize,
    previous_index: Option<usize>,
    slide_count: usize,
    cooldown: CooldownTimer,
    torn_down: bool,
}

/// The card-stack state machine
///
/// Requests that would move out of range, stay on the current slide or land
/// inside the cooldown are dropped without a trace; that is how rapid input is
/// debounced.
pub struct NavigationEngine {
    state: Arc<RwLock<NavigationState>>,
    subscribers: Arc<RwLock<Vec<Weak<dyn NavigationSubscriber>>>>,
    style: StackStyle,
    cooldown_ms: u64,
}

impl NavigationEngine {
    /// Create an engine for a fixed number of slides, starting on the first
    pub fn new(slide_count: usize, style: StackStyle, cooldown_ms: u64) -> Self {
        let state = NavigationState {
            current_index: 0,
            previous_index: None,
            slide_count,
            cooldown: CooldownTimer::default(),
            torn_down: false,
        };

        Self {
            state: Arc::new(RwLock::new(state)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
            style,
            cooldown_ms,
        }
    }

    /// Move to `target` if it is in range, not current, and the cooldown is over
    pub fn go_to(&self, target: usize, now_ms: u64) -> Option<Transition> {
        let mut state = self.state.write();

        if state.torn_down {
            return None;
        }

        if state.cooldown.expired(now_ms) {
            state.cooldown.cancel();
        }

        if target >= state.slide_count || target == state.current_index || state.cooldown.is_running() {
            return None;
        }

        let from = state.current_index;
        state.previous_index = Some(from);
        state.current_index = target;
        state.cooldown.start(now_ms, self.cooldown_ms);

        let transition = Transition {
            from,
            to: target,
            unlock_at_ms: state.cooldown.deadline().unwrap_or(now_ms),
        };

        drop(state);

        debug!(from, to = target, "slide transition");
        self.notify_subscribers();
        Some(transition)
    }

    /// Move one slide forward
    pub fn next(&self, now_ms: u64) -> Option<Transition> {
        let target = self.current_index() + 1;
        self.go_to(target, now_ms)
    }

    /// Move one slide back
    pub fn previous(&self, now_ms: u64) -> Option<Transition> {
        let current = self.current_index();
        if current == 0 {
            return None;
        }
        self.go_to(current - 1, now_ms)
    }

    /// Release the lock once the cooldown has elapsed; returns true on release
    pub fn tick(&self, now_ms: u64) -> bool {
        let mut state = self.state.write();
        if state.cooldown.expired(now_ms) {
            state.cooldown.cancel();
            return true;
        }
        false
    }

    /// Cancel the cooldown and refuse all further transitions
    pub fn teardown(&self) {
        let mut state = self.state.write();
        state.cooldown.cancel();
        state.torn_down = true;
        drop(state);

        self.subscribers.write().clear();
    }

    /// Whether teardown has run
    pub fn is_torn_down(&self) -> bool {
        self.state.read().torn_down
    }

    /// Index of the active slide
    pub fn current_index(&self) -> usize {
        self.state.read().current_index
    }

    /// Number of slides
    pub fn slide_count(&self) -> usize {
        self.state.read().slide_count
    }

    /// Whether the cooldown is running
    pub fn is_locked(&self) -> bool {
        self.state.read().cooldown.is_running()
    }

    /// When the running cooldown ends
    pub fn unlock_deadline(&self) -> Option<u64> {
        self.state.read().cooldown.deadline()
    }

    /// Stacking parameters used for visual state
    pub fn style(&self) -> &StackStyle {
        &self.style
    }

    /// Visual state of every slide for the current index
    pub fn visuals(&self) -> Vec<CardVisual> {
        let state = self.state.read();
        compute_visuals(state.current_index, state.slide_count, &self.style)
    }

    /// Get current navigation context
    pub fn context(&self) -> NavigationContext {
        let state = self.state.read();
        NavigationContext {
            current_index: state.current_index,
            previous_index: state.previous_index,
            slide_count: state.slide_count,
            locked: state.cooldown.is_running(),
            visuals: compute_visuals(state.current_index, state.slide_count, &self.style),
        }
    }

    /// Add a subscriber; the engine only keeps a weak reference
    pub fn add_subscriber(&self, subscriber: Arc<dyn NavigationSubscriber>) {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    /// Notify all subscribers of navigation change
    fn notify_subscribers(&self) {
        let context = self.context();
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);

        for weak in subscribers.iter() {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_navigation_change(&context);
            }
        }
    }
}
