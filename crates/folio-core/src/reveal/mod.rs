//! Reveal-on-scroll and the session counter
//!
//! Elements of the active slide are revealed once their top edge climbs above
//! the bottom margin of the visible region. Reveals never reset. Counter
//! elements additionally start the count-up animation, which runs at most once
//! per session no matter how often they come back into view.

mod counter;

pub use counter::CounterAnimation;

use ahash::AHashSet;
use tracing::debug;

use crate::config::RevealConfig;
use crate::surface::SlideSurface;
use crate::timer::CounterId;

/// Outcome of one reveal check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevealReport {
    /// Keys revealed by this check
    pub newly_revealed: Vec<String>,

    /// Counter animations started by this check
    pub started: Vec<CounterId>,
}

/// Progress of one counter tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterStep {
    pub value: u64,
    pub finished: bool,
}

/// Watches the active slide for elements entering the view
#[derive(Debug, Default)]
pub struct RevealTrigger {
    config: RevealConfig,
    revealed: AHashSet<(usize, String)>,
    counter_latch: bool,
    counters: Vec<CounterAnimation>,
    armed: Option<usize>,
}

impl RevealTrigger {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Watch `slide` from now on and check it once
    pub fn arm<S: SlideSurface>(&mut self, slide: usize, surface: &mut S) -> RevealReport {
        self.armed = Some(slide);
        self.check(surface)
    }

    /// Slide currently watched
    pub fn armed(&self) -> Option<usize> {
        self.armed
    }

    /// Re-evaluate the armed slide, typically after its content scrolled
    pub fn check<S: SlideSurface>(&mut self, surface: &mut S) -> RevealReport {
        let mut report = RevealReport::default();

        let Some(slide) = self.armed else {
            return report;
        };
        let Some(metrics) = surface.scroll_metrics(slide) else {
            return report;
        };

        let line = metrics.viewport_height - self.config.reveal_margin;
        let probes = surface.revealables(slide);
        let mut counter_in_view = false;

        for probe in probes.iter().filter(|p| p.top < line) {
            if self.revealed.insert((slide, probe.key.clone())) {
                surface.mark_revealed(slide, &probe.key);
                debug!(slide, element = %probe.key, "element revealed");
                report.newly_revealed.push(probe.key.clone());
            }
            if probe.is_counter && probe.counter_target.is_some() {
                counter_in_view = true;
            }
        }

        if counter_in_view && !self.counter_latch {
            self.counter_latch = true;
            for probe in probes.iter().filter(|p| p.is_counter) {
                let Some(target) = probe.counter_target else {
                    continue;
                };
                let animation = CounterAnimation::new(
                    slide,
                    probe.key.clone(),
                    target,
                    self.config.counter_duration_ms,
                    self.config.counter_tick_ms,
                );
                surface.set_counter_value(slide, &probe.key, 0);
                self.counters.push(animation);
                report.started.push(self.counters.len() - 1);
            }
            debug!(slide, counters = report.started.len(), "counter animation started");
        }

        report
    }

    /// Advance one counter and show its new value
    pub fn step_counter<S: SlideSurface>(&mut self, id: CounterId, surface: &mut S) -> Option<CounterStep> {
        let counter = self.counters.get_mut(id)?;
        if counter.is_finished() {
            return None;
        }

        let value = counter.step();
        surface.set_counter_value(counter.slide, &counter.key, value);
        Some(CounterStep {
            value,
            finished: counter.is_finished(),
        })
    }

    /// Whether the session counter animation has fired
    pub fn counters_fired(&self) -> bool {
        self.counter_latch
    }

    /// Whether a counter animation exists for this element
    pub fn has_counter(&self, key: &str) -> bool {
        self.counters.iter().any(|c| c.key == key)
    }

    pub fn counter(&self, id: CounterId) -> Option<&CounterAnimation> {
        self.counters.get(id)
    }

    /// Whether an element has been revealed this session
    pub fn is_revealed(&self, slide: usize, key: &str) -> bool {
        self.revealed.contains(&(slide, key.to_string()))
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{MemorySlide, MemorySurface, RevealProbe, ScrollMetrics};

    fn stats_surface(counter_top: f32) -> MemorySurface {
        MemorySurface::new(vec![
            MemorySlide::new("home").with_metrics(ScrollMetrics::new(0.0, 800.0, 800.0)),
            MemorySlide::new("stats")
                .with_metrics(ScrollMetrics::new(0.0, 2000.0, 800.0))
                .with_probe(RevealProbe::block("intro", 100.0))
                .with_probe(RevealProbe::block("footer", 1500.0))
                .with_probe(RevealProbe::counter("repos", counter_top, Some(32)))
                .with_probe(RevealProbe::counter("stars", counter_top + 40.0, Some(120))),
        ])
    }

    #[test]
    fn test_arm_reveals_elements_above_margin() {
        let mut surface = stats_surface(1200.0);
        let mut trigger = RevealTrigger::new(RevealConfig::default());

        let report = trigger.arm(1, &mut surface);
        assert_eq!(report.newly_revealed, vec!["intro".to_string()]);
        assert!(report.started.is_empty());
        assert!(surface.slide(1).is_revealed("intro"));
        assert!(!surface.slide(1).is_revealed("footer"));
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let mut surface = stats_surface(1200.0);
        let mut trigger = RevealTrigger::new(RevealConfig::default());

        trigger.arm(1, &mut surface);
        let again = trigger.check(&mut surface);
        assert!(again.newly_revealed.is_empty());
        assert_eq!(surface.slide(1).revealed.len(), 1);
    }

    #[test]
    fn test_margin_boundary() {
        // viewport 800, margin 80: the line sits at 720
        let mut surface = MemorySurface::new(vec![MemorySlide::new("s")
            .with_metrics(ScrollMetrics::new(0.0, 800.0, 800.0))
            .with_probe(RevealProbe::block("on-line", 720.0))
            .with_probe(RevealProbe::block("above", 719.0))]);
        let mut trigger = RevealTrigger::new(RevealConfig::default());

        let report = trigger.arm(0, &mut surface);
        assert_eq!(report.newly_revealed, vec!["above".to_string()]);
    }

    #[test]
    fn test_counter_fires_once_per_session() {
        let mut surface = stats_surface(300.0);
        let mut trigger = RevealTrigger::new(RevealConfig::default());

        let first = trigger.arm(1, &mut surface);
        assert_eq!(first.started, vec![0, 1]);
        assert!(trigger.counters_fired());

        // Scroll the counters out of view and back in, then re-arm the slide
        surface.slide_mut(1).probes[2].top = -500.0;
        assert!(trigger.check(&mut surface).started.is_empty());
        surface.slide_mut(1).probes[2].top = 300.0;
        assert!(trigger.check(&mut surface).started.is_empty());
        trigger.arm(0, &mut surface);
        assert!(trigger.arm(1, &mut surface).started.is_empty());
    }

    #[test]
    fn test_counter_waits_for_target() {
        let mut surface = MemorySurface::new(vec![MemorySlide::new("stats")
            .with_metrics(ScrollMetrics::new(0.0, 800.0, 800.0))
            .with_probe(RevealProbe::counter("repos", 100.0, None))]);
        let mut trigger = RevealTrigger::new(RevealConfig::default());

        let report = trigger.arm(0, &mut surface);
        assert_eq!(report.newly_revealed, vec!["repos".to_string()]);
        assert!(report.started.is_empty());
        assert!(!trigger.counters_fired());

        surface.set_counter_target("repos", 9);
        assert_eq!(trigger.check(&mut surface).started, vec![0]);
    }

    #[test]
    fn test_step_counter_updates_surface() {
        let mut surface = stats_surface(300.0);
        let mut trigger = RevealTrigger::new(RevealConfig {
            counter_duration_ms: 32,
            counter_tick_ms: 16,
            ..RevealConfig::default()
        });
        trigger.arm(1, &mut surface);

        assert_eq!(trigger.step_counter(0, &mut surface), Some(CounterStep { value: 16, finished: false }));
        assert_eq!(trigger.step_counter(0, &mut surface), Some(CounterStep { value: 32, finished: true }));
        assert_eq!(trigger.step_counter(0, &mut surface), None);
        assert_eq!(surface.slide(1).counter_values.get("repos"), Some(&32));
        assert_eq!(trigger.step_counter(7, &mut surface), None);
    }

    #[test]
    fn test_slide_without_scroll_region_is_noop() {
        let mut surface = MemorySurface::new(vec![
            MemorySlide::new("bare").with_probe(RevealProbe::block("x", 0.0)),
        ]);
        let mut trigger = RevealTrigger::new(RevealConfig::default());

        assert_eq!(trigger.arm(0, &mut surface), RevealReport::default());
        assert!(surface.slide(0).revealed.is_empty());
    }
}
