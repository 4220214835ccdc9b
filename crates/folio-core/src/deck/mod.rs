//! Deck orchestration
//!
//! Wires the one-way flow: raw input goes through the gesture interpreter to
//! the navigation engine, accepted transitions recompute every card's visual
//! state, and the reveal trigger is re-armed for the newly active slide after a
//! short delay.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::DeckConfig;
use crate::events::events::{CounterFinished, CounterStarted, ElementRevealed, SlideChanged, StatsRequested};
use crate::events::EventBus;
use crate::gesture::{GestureInterpreter, GestureOutcome};
use crate::navigation::{NavigationContext, NavigationEngine};
use crate::page::PageIndicators;
use crate::reveal::{RevealReport, RevealTrigger};
use crate::surface::SlideSurface;
use crate::timer::{Scheduler, Task};

/// A card-stack deck bound to a rendering surface
pub struct Deck<S: SlideSurface> {
    /// Where slides live and visual state is applied
    surface: S,

    /// The navigation engine
    navigation: Arc<NavigationEngine>,

    /// Wheel and touch interpretation
    gestures: GestureInterpreter,

    /// Reveal and counter trigger
    reveal: RevealTrigger,

    /// Deferred reveal checks and counter ticks
    scheduler: Scheduler,

    /// The event bus
    event_bus: Arc<EventBus>,

    /// Deck configuration
    config: DeckConfig,

    stats_requested: bool,
    torn_down: bool,
}

impl<S: SlideSurface> Deck<S> {
    /// Build a deck over `surface`, starting on the first slide at time `now_ms`
    pub fn new(surface: S, config: DeckConfig, now_ms: u64) -> Self {
        let navigation = NavigationEngine::new(
            surface.slide_count(),
            config.stack.clone(),
            config.navigation.cooldown_ms,
        );

        let mut deck = Self {
            gestures: GestureInterpreter::new(config.gesture.clone()),
            reveal: RevealTrigger::new(config.reveal.clone()),
            surface,
            navigation: Arc::new(navigation),
            scheduler: Scheduler::new(),
            event_bus: Arc::new(EventBus::new()),
            config,
            stats_requested: false,
            torn_down: false,
        };

        deck.apply_visuals();
        if deck.surface.slide_count() > 0 {
            deck.scheduler.schedule(now_ms, deck.config.navigation.reveal_delay_ms, Task::RevealCheck);
        }

        info!(slides = deck.surface.slide_count(), "deck ready");
        deck
    }

    /// Go to the slide at `target`; returns whether the transition was accepted
    pub fn go_to(&mut self, target: usize, now_ms: u64) -> bool {
        if self.torn_down {
            return false;
        }

        let Some(transition) = self.navigation.go_to(target, now_ms) else {
            return false;
        };

        self.apply_visuals();

        let slide_id = self.surface.slide_id(transition.to).unwrap_or_default().to_string();
        self.event_bus.publish(SlideChanged {
            from: transition.from,
            to: transition.to,
            slide_id,
        });

        self.scheduler.schedule(now_ms, self.config.navigation.reveal_delay_ms, Task::RevealCheck);
        self.maybe_request_stats(transition.to);
        true
    }

    /// Go to the slide with identifier `id`, as a navigation link does
    pub fn go_to_id(&mut self, id: &str, now_ms: u64) -> bool {
        match self.surface.ordinal_of(id) {
            Some(ordinal) => self.go_to(ordinal, now_ms),
            None => false,
        }
    }

    /// Wheel input; positive `delta` scrolls toward the end of the content
    pub fn on_wheel(&mut self, delta: f32, now_ms: u64) -> GestureOutcome {
        let context = self.navigation.context();
        let metrics = self.surface.scroll_metrics(context.current_index);
        let outcome = self.gestures.on_wheel(delta, metrics, &context);
        self.follow(outcome, now_ms);
        outcome
    }

    /// A finger touched down at height `y`
    pub fn on_touch_start(&mut self, y: f32) {
        self.gestures.on_touch_start(y);
    }

    /// The touch sequence was interrupted
    pub fn on_touch_cancel(&mut self) {
        self.gestures.on_touch_cancel();
    }

    /// The finger lifted at height `y`
    pub fn on_touch_end(&mut self, y: f32, now_ms: u64) -> GestureOutcome {
        let context = self.navigation.context();
        let metrics = self.surface.scroll_metrics(context.current_index);
        let outcome = self.gestures.on_touch_end(y, metrics, &context);
        self.follow(outcome, now_ms);
        outcome
    }

    /// Content of the slide at `ordinal` scrolled
    pub fn on_content_scroll(&mut self, ordinal: usize, now_ms: u64) {
        if self.torn_down || self.reveal.armed() != Some(ordinal) {
            return;
        }
        let report = self.reveal.check(&mut self.surface);
        self.handle_report(report, now_ms);
    }

    /// Run everything due at `now_ms`: cooldown release, reveal checks, counter ticks
    pub fn tick(&mut self, now_ms: u64) {
        if self.torn_down {
            return;
        }

        self.navigation.tick(now_ms);

        for task in self.scheduler.due(now_ms) {
            match task {
                Task::RevealCheck => {
                    // Always the slide active now, not the one that scheduled the check
                    let current = self.navigation.current_index();
                    let report = self.reveal.arm(current, &mut self.surface);
                    self.handle_report(report, now_ms);
                    // Covers a stats slide that was active from the start
                    self.maybe_request_stats(current);
                }
                Task::CounterTick(id) => {
                    let Some(step) = self.reveal.step_counter(id, &mut self.surface) else {
                        continue;
                    };
                    if step.finished {
                        if let Some(counter) = self.reveal.counter(id) {
                            self.event_bus.publish(CounterFinished {
                                slide: counter.slide,
                                element: counter.key.clone(),
                                value: step.value,
                            });
                        }
                    } else {
                        self.scheduler.schedule(now_ms, self.config.reveal.counter_tick_ms, Task::CounterTick(id));
                    }
                }
            }
        }
    }

    /// Record a counter target supplied by the statistics collaborator
    ///
    /// Returns false if no counter element carries `key`.
    pub fn set_counter_target(&mut self, key: &str, value: u64, now_ms: u64) -> bool {
        if self.torn_down || !self.surface.set_counter_target(key, value) {
            return false;
        }

        if self.reveal.counters_fired() {
            // The session animation already ran; show late arrivals as they are
            if !self.reveal.has_counter(key) {
                for ordinal in 0..self.surface.slide_count() {
                    let holds_key = self
                        .surface
                        .revealables(ordinal)
                        .iter()
                        .any(|p| p.is_counter && p.key == key);
                    if holds_key {
                        self.surface.set_counter_value(ordinal, key, value);
                    }
                }
            }
        } else {
            let report = self.reveal.check(&mut self.surface);
            self.handle_report(report, now_ms);
        }

        true
    }

    /// Progress, back-to-top and parallax for the active slide
    pub fn page_indicators(&self) -> PageIndicators {
        let metrics = self.surface.scroll_metrics(self.navigation.current_index());
        PageIndicators::from_metrics(metrics, &self.config.page)
    }

    /// Cancel all pending timers and stop reacting to input
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.scheduler.cancel_all();
        self.navigation.teardown();
        self.event_bus.clear();
        info!("deck torn down");
    }

    /// Earliest time something is scheduled to happen
    pub fn next_wakeup(&self) -> Option<u64> {
        match (self.scheduler.next_deadline(), self.navigation.unlock_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn current_index(&self) -> usize {
        self.navigation.current_index()
    }

    pub fn is_locked(&self) -> bool {
        self.navigation.is_locked()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn context(&self) -> NavigationContext {
        self.navigation.context()
    }

    pub fn navigation(&self) -> &Arc<NavigationEngine> {
        &self.navigation
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn reveal(&self) -> &RevealTrigger {
        &self.reveal
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn follow(&mut self, outcome: GestureOutcome, now_ms: u64) {
        if let Some(target) = outcome.intent.target() {
            self.go_to(target, now_ms);
        }
    }

    fn apply_visuals(&mut self) {
        for visual in self.navigation.visuals() {
            self.surface.apply_visual(&visual);
        }
    }

    fn handle_report(&mut self, report: RevealReport, now_ms: u64) {
        let Some(slide) = self.reveal.armed() else {
            return;
        };

        for element in report.newly_revealed {
            self.event_bus.publish(ElementRevealed { slide, element });
        }

        if !report.started.is_empty() {
            self.event_bus.publish(CounterStarted {
                slide,
                counters: report.started.len(),
            });
            for id in report.started {
                self.scheduler.schedule(now_ms, self.config.reveal.counter_tick_ms, Task::CounterTick(id));
            }
        }
    }

    fn maybe_request_stats(&mut self, ordinal: usize) {
        if self.stats_requested {
            return;
        }
        let Some(stats_slide) = self.config.stats_slide.as_deref() else {
            return;
        };
        if self.surface.slide_id(ordinal) != Some(stats_slide) {
            return;
        }

        self.stats_requested = true;
        debug!(slide = stats_slide, "requesting counter targets");
        self.event_bus.publish(StatsRequested {
            slide_id: stats_slide.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::typed_handler;
    use crate::navigation::CardRole;
    use crate::surface::{MemorySlide, MemorySurface, RevealProbe, ScrollMetrics};
    use parking_lot::Mutex;

    fn scrolled_to_bottom() -> ScrollMetrics {
        ScrollMetrics::new(1200.0, 2000.0, 800.0)
    }

    fn five_slides() -> MemorySurface {
        MemorySurface::new(
            ["home", "about", "projects", "stats", "contact"]
                .iter()
                .map(|id| MemorySlide::new(*id).with_metrics(scrolled_to_bottom()))
                .collect(),
        )
    }

    fn deck() -> Deck<MemorySurface> {
        Deck::new(five_slides(), DeckConfig::default(), 0)
    }

    fn role(deck: &Deck<MemorySurface>, ordinal: usize) -> CardRole {
        deck.surface().slide(ordinal).visual.as_ref().unwrap().role
    }

    #[test]
    fn test_initial_visuals_applied() {
        let deck = deck();
        assert_eq!(deck.current_index(), 0);
        assert_eq!(role(&deck, 0), CardRole::Active);
        for ordinal in 1..5 {
            assert_eq!(role(&deck, ordinal), CardRole::Upcoming);
        }
        assert_eq!(deck.surface().slide(4).visual.as_ref().unwrap().opacity, 0.0);
    }

    #[test]
    fn test_wheel_at_bottom_advances() {
        let mut deck = deck();
        let outcome = deck.on_wheel(120.0, 1_000);

        assert!(outcome.consumed);
        assert_eq!(deck.current_index(), 1);
        assert_eq!(role(&deck, 0), CardRole::Previous);
        assert_eq!(role(&deck, 1), CardRole::Active);
    }

    #[test]
    fn test_locked_deck_rejects_every_go_to() {
        let mut deck = deck();
        assert!(deck.go_to(2, 0));
        assert!(deck.is_locked());

        for target in 0..5 {
            assert!(!deck.go_to(target, 100));
        }
        assert_eq!(deck.current_index(), 2);
    }

    #[test]
    fn test_cooldown_released_by_tick() {
        let mut deck = deck();
        deck.go_to(1, 0);
        deck.tick(799);
        assert!(deck.is_locked());
        deck.tick(800);
        assert!(!deck.is_locked());
        assert!(deck.go_to(2, 800));
    }

    #[test]
    fn test_short_swipe_does_not_navigate() {
        let mut deck = deck();
        deck.on_touch_start(500.0);
        let outcome = deck.on_touch_end(470.0, 1_000);
        assert!(!outcome.consumed);
        assert_eq!(deck.current_index(), 0);
    }

    #[test]
    fn test_long_swipe_navigates() {
        let mut deck = deck();
        deck.on_touch_start(500.0);
        deck.on_touch_end(300.0, 1_000);
        assert_eq!(deck.current_index(), 1);
    }

    #[test]
    fn test_mid_scroll_wheel_leaves_deck_alone() {
        let mut surface = five_slides();
        surface.slide_mut(0).metrics = Some(ScrollMetrics::new(300.0, 2000.0, 800.0));
        let mut deck = Deck::new(surface, DeckConfig::default(), 0);

        assert!(!deck.on_wheel(120.0, 1_000).consumed);
        assert!(!deck.on_wheel(-120.0, 1_000).consumed);
        assert_eq!(deck.current_index(), 0);
    }

    #[test]
    fn test_go_to_id() {
        let mut deck = deck();
        assert!(deck.go_to_id("stats", 0));
        assert_eq!(deck.current_index(), 3);
        assert!(!deck.go_to_id("blog", 5_000));
        assert_eq!(deck.current_index(), 3);
    }

    #[test]
    fn test_slide_changed_published() {
        let mut deck = deck();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        deck.event_bus().subscribe::<SlideChanged>(typed_handler(move |e: &SlideChanged| {
            sink.lock().push((e.from, e.to, e.slide_id.clone()));
        }));

        deck.go_to(2, 0);
        deck.go_to(3, 100);

        assert_eq!(*seen.lock(), vec![(0, 2, "projects".to_string())]);
    }

    #[test]
    fn test_stats_requested_for_initial_slide() {
        let surface = MemorySurface::new(vec![
            MemorySlide::new("stats").with_metrics(ScrollMetrics::new(0.0, 800.0, 800.0)),
            MemorySlide::new("contact"),
        ]);
        let config = DeckConfig {
            stats_slide: Some("stats".to_string()),
            ..DeckConfig::default()
        };
        let mut deck = Deck::new(surface, config, 0);

        let requests = Arc::new(Mutex::new(0));
        let sink = requests.clone();
        deck.event_bus().subscribe::<StatsRequested>(typed_handler(move |_: &StatsRequested| {
            *sink.lock() += 1;
        }));

        deck.tick(5_000);
        assert_eq!(*requests.lock(), 1);

        // Coming back to the slide does not ask again
        deck.go_to(1, 5_000);
        deck.go_to(0, 6_000);
        deck.tick(10_000);
        assert_eq!(*requests.lock(), 1);
    }

    fn stats_deck() -> Deck<MemorySurface> {
        let mut surface = five_slides();
        surface.slides[3] = MemorySlide::new("stats")
            .with_metrics(ScrollMetrics::new(0.0, 800.0, 800.0))
            .with_probe(RevealProbe::block("heading", 50.0))
            .with_probe(RevealProbe::counter("repos", 200.0, None));

        let config = DeckConfig {
            stats_slide: Some("stats".to_string()),
            ..DeckConfig::default()
        };
        Deck::new(surface, config, 0)
    }

    #[test]
    fn test_reveal_check_runs_after_delay_on_active_slide() {
        let mut deck = stats_deck();
        deck.tick(300);
        assert_eq!(deck.reveal().armed(), Some(0));
        deck.go_to(3, 1_000);

        deck.tick(1_299);
        assert!(deck.surface().slide(3).revealed.is_empty());

        deck.tick(1_300);
        assert!(deck.surface().slide(3).is_revealed("heading"));
        assert_eq!(deck.reveal().armed(), Some(3));
    }

    #[test]
    fn test_stale_reveal_check_reads_current_slide() {
        let mut config = stats_deck().config().clone();
        config.navigation.reveal_delay_ms = 1_000;
        let mut deck = Deck::new(five_slides(), config, 0);
        deck.surface_mut().slides[3] = stats_deck().surface().slide(3).clone();

        deck.go_to(2, 0);
        deck.go_to(3, 800);

        // The check scheduled by the first transition fires while slide 3 is active
        deck.tick(1_000);
        assert_eq!(deck.reveal().armed(), Some(3));
        assert!(deck.surface().slide(3).is_revealed("heading"));
        assert!(deck.surface().slide(2).revealed.is_empty());
    }

    #[test]
    fn test_stats_requested_once_and_counter_runs_once() {
        let mut deck = stats_deck();
        let requests = Arc::new(Mutex::new(0));
        let finished = Arc::new(Mutex::new(Vec::new()));

        let sink = requests.clone();
        deck.event_bus().subscribe::<StatsRequested>(typed_handler(move |_: &StatsRequested| {
            *sink.lock() += 1;
        }));
        let sink = finished.clone();
        deck.event_bus().subscribe::<CounterFinished>(typed_handler(move |e: &CounterFinished| {
            sink.lock().push((e.element.clone(), e.value));
        }));

        deck.go_to(3, 0);
        deck.tick(300);
        assert_eq!(*requests.lock(), 1);
        assert!(!deck.reveal().counters_fired());

        // Collaborator answers while the counter is already in view
        assert!(deck.set_counter_target("repos", 40, 400));
        assert!(deck.reveal().counters_fired());

        let mut now = 400;
        while now < 3_000 {
            now += 16;
            deck.tick(now);
        }
        assert_eq!(*finished.lock(), vec![("repos".to_string(), 40)]);
        assert_eq!(deck.surface().slide(3).counter_values.get("repos"), Some(&40));

        // Leave and come back: no second request, no second animation
        deck.go_to(4, now);
        deck.go_to(3, now + 1_000);
        deck.tick(now + 2_000);
        assert_eq!(*requests.lock(), 1);
        assert_eq!(finished.lock().len(), 1);
    }

    #[test]
    fn test_unknown_counter_target_rejected() {
        let mut deck = stats_deck();
        assert!(!deck.set_counter_target("followers", 3, 0));
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let mut deck = stats_deck();
        deck.go_to(3, 0);
        assert!(deck.next_wakeup().is_some());

        deck.teardown();
        assert!(deck.next_wakeup().is_none());
        assert!(!deck.is_locked());

        deck.tick(10_000);
        assert!(deck.surface().slide(3).revealed.is_empty());
        assert!(!deck.go_to(1, 10_000));
        deck.on_wheel(-120.0, 10_000);
        assert_eq!(deck.current_index(), 3);
    }

    #[test]
    fn test_page_indicators_follow_active_slide() {
        let mut surface = five_slides();
        surface.slide_mut(1).metrics = Some(ScrollMetrics::new(600.0, 1400.0, 800.0));
        let mut deck = Deck::new(surface, DeckConfig::default(), 0);

        assert_eq!(deck.page_indicators().progress_pct, 100.0);
        deck.go_to(1, 0);
        let indicators = deck.page_indicators();
        assert_eq!(indicators.progress_pct, 100.0);
        assert!(indicators.show_back_to_top);
    }

    #[test]
    fn test_empty_deck() {
        let mut deck = Deck::new(MemorySurface::default(), DeckConfig::default(), 0);
        assert!(deck.next_wakeup().is_none());
        assert!(!deck.on_wheel(120.0, 0).consumed);
        assert!(!deck.go_to(0, 0));
    }
}
