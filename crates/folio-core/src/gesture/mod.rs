//! Wheel and swipe interpretation
//!
//! Raw input plus the scroll position of the active slide's content becomes a
//! navigation intent. Navigation only happens at the edges of the content; in
//! the middle the event belongs to the content itself.

use crate::config::GestureConfig;
use crate::navigation::NavigationContext;
use crate::surface::ScrollMetrics;

/// What the input asks the deck to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    /// Let the content handle the event
    None,
    /// Move forward to the given slide
    Advance(usize),
    /// Move back to the given slide
    Retreat(usize),
}

impl NavIntent {
    /// Target slide, if any
    pub fn target(&self) -> Option<usize> {
        match self {
            NavIntent::None => None,
            NavIntent::Advance(target) | NavIntent::Retreat(target) => Some(*target),
        }
    }
}

/// Result of interpreting one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureOutcome {
    pub intent: NavIntent,

    /// The host should suppress default handling; only true for navigation
    pub consumed: bool,
}

impl GestureOutcome {
    fn from_intent(intent: NavIntent) -> Self {
        Self {
            intent,
            consumed: intent != NavIntent::None,
        }
    }
}

/// Edge state of the active slide's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentEdges {
    pub at_top: bool,
    pub at_bottom: bool,
}

impl ContentEdges {
    /// Edges from scroll geometry; a slide without a scroll region is fully visible
    pub fn from_metrics(metrics: Option<ScrollMetrics>, tolerance: f32) -> Self {
        match metrics {
            Some(m) => Self {
                at_top: m.at_top(),
                at_bottom: m.at_bottom(tolerance),
            },
            None => Self {
                at_top: true,
                at_bottom: true,
            },
        }
    }
}

/// Turns wheel and touch input into navigation intents
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    config: GestureConfig,
    touch_start_y: Option<f32>,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            touch_start_y: None,
        }
    }

    /// Interpret a wheel event; positive `delta` scrolls toward the content end
    pub fn on_wheel(
        &self,
        delta: f32,
        metrics: Option<ScrollMetrics>,
        nav: &NavigationContext,
    ) -> GestureOutcome {
        let edges = ContentEdges::from_metrics(metrics, self.config.bottom_tolerance);
        GestureOutcome::from_intent(decide(delta, edges, nav))
    }

    /// Remember where a touch sequence began
    pub fn on_touch_start(&mut self, y: f32) {
        self.touch_start_y = Some(y);
    }

    /// Forget an interrupted touch sequence
    pub fn on_touch_cancel(&mut self) {
        self.touch_start_y = None;
    }

    /// Interpret the end of a touch sequence
    pub fn on_touch_end(
        &mut self,
        y: f32,
        metrics: Option<ScrollMetrics>,
        nav: &NavigationContext,
    ) -> GestureOutcome {
        let Some(start_y) = self.touch_start_y.take() else {
            return GestureOutcome::from_intent(NavIntent::None);
        };

        // Finger moving up (start below end) reads like scrolling toward the end
        let delta = start_y - y;
        if delta.abs() < self.config.swipe_threshold {
            return GestureOutcome::from_intent(NavIntent::None);
        }

        let edges = ContentEdges::from_metrics(metrics, self.config.bottom_tolerance);
        GestureOutcome::from_intent(decide(delta, edges, nav))
    }

    /// Whether a touch sequence is in progress
    pub fn touch_in_progress(&self) -> bool {
        self.touch_start_y.is_some()
    }
}

fn decide(delta: f32, edges: ContentEdges, nav: &NavigationContext) -> NavIntent {
    if nav.slide_count == 0 {
        return NavIntent::None;
    }

    if delta > 0.0 && edges.at_bottom && !nav.is_last() {
        NavIntent::Advance(nav.current_index + 1)
    } else if delta < 0.0 && edges.at_top && !nav.is_first() {
        NavIntent::Retreat(nav.current_index - 1)
    } else {
        NavIntent::None
    }
}
