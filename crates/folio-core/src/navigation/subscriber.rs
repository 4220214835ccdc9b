//! Navigation subscriber trait

use super::NavigationContext;

/// Trait for components that need to respond to slide changes
pub trait NavigationSubscriber: Send + Sync {
    /// Called after every accepted transition
    fn on_navigation_change(&self, context: &NavigationContext);
}
