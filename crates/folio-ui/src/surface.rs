//! Slide surface backed by egui frames
//!
//! The painter records scroll geometry and block positions here every frame;
//! the deck reads them back and writes visual state, reveals and counter values.

use ahash::{AHashMap, AHashSet};
use folio_core::{CardVisual, RevealProbe, ScrollMetrics, SlideSurface};
use tracing::trace;

use crate::content::{Block, SlideContent};

/// Per-slide state shared between the painter and the deck
#[derive(Debug, Clone)]
pub struct SlideState {
    pub content: SlideContent,
    pub visual: Option<CardVisual>,

    /// Last painted scroll geometry; `None` until painted or when not scrollable
    pub metrics: Option<ScrollMetrics>,

    /// Block tops from the last paint, relative to the visible region
    pub block_tops: AHashMap<String, f32>,

    pub revealed: AHashSet<String>,
    pub counter_values: AHashMap<String, u64>,
    pub counter_targets: AHashMap<String, u64>,

    /// Jump the scroll region back to the top on the next paint
    pub scroll_to_top: bool,
}

impl SlideState {
    fn new(content: SlideContent) -> Self {
        let counter_targets = content
            .blocks
            .iter()
            .flat_map(|block| match block {
                Block::Stats { counters, .. } => counters
                    .iter()
                    .filter_map(|c| c.target.map(|t| (c.key.clone(), t)))
                    .collect(),
                _ => Vec::new(),
            })
            .collect();

        Self {
            content,
            visual: None,
            metrics: None,
            block_tops: AHashMap::default(),
            revealed: AHashSet::default(),
            counter_values: AHashMap::default(),
            counter_targets,
            scroll_to_top: false,
        }
    }

    pub fn is_revealed(&self, key: &str) -> bool {
        self.revealed.contains(key)
    }

    /// Whether a block is drawn at full strength
    ///
    /// Slides without a scroll region never run reveal checks, so their
    /// blocks are shown as they are.
    pub fn shows_block(&self, key: &str) -> bool {
        !self.content.scrollable || self.is_revealed(key)
    }

    /// Text for a counter: the animated value, else the target, else a dash
    pub fn counter_text(&self, key: &str) -> String {
        self.counter_values
            .get(key)
            .or_else(|| self.counter_targets.get(key))
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// All slides of the deck as the egui host sees them
#[derive(Debug, Clone, Default)]
pub struct EguiSurface {
    slides: Vec<SlideState>,
}

impl EguiSurface {
    pub fn new(slides: Vec<SlideContent>) -> Self {
        Self {
            slides: slides.into_iter().map(SlideState::new).collect(),
        }
    }

    pub fn slides(&self) -> &[SlideState] {
        &self.slides
    }

    pub fn slide(&self, ordinal: usize) -> Option<&SlideState> {
        self.slides.get(ordinal)
    }

    pub fn slide_mut(&mut self, ordinal: usize) -> Option<&mut SlideState> {
        self.slides.get_mut(ordinal)
    }

    /// Record what the painter saw for a slide this frame
    ///
    /// Returns true when the scroll offset moved since the last paint.
    pub fn record_paint(
        &mut self,
        ordinal: usize,
        metrics: ScrollMetrics,
        block_tops: AHashMap<String, f32>,
    ) -> bool {
        let Some(slide) = self.slides.get_mut(ordinal) else {
            return false;
        };

        let moved = slide
            .metrics
            .map(|previous| previous.offset != metrics.offset)
            .unwrap_or(false);

        if slide.content.scrollable {
            slide.metrics = Some(metrics);
        }
        slide.block_tops = block_tops;
        moved
    }

    /// Ask the painter to reset a slide's scroll region
    pub fn request_scroll_to_top(&mut self, ordinal: usize) {
        if let Some(slide) = self.slides.get_mut(ordinal) {
            slide.scroll_to_top = true;
        }
    }
}

impl SlideSurface for EguiSurface {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn slide_id(&self, ordinal: usize) -> Option<&str> {
        self.slides.get(ordinal).map(|s| s.content.id.as_str())
    }

    fn scroll_metrics(&self, ordinal: usize) -> Option<ScrollMetrics> {
        self.slides.get(ordinal).and_then(|s| s.metrics)
    }

    fn revealables(&self, ordinal: usize) -> Vec<RevealProbe> {
        let Some(slide) = self.slides.get(ordinal) else {
            return Vec::new();
        };

        let mut probes = Vec::new();
        for block in &slide.content.blocks {
            let Some(&top) = slide.block_tops.get(block.key()) else {
                continue;
            };
            probes.push(RevealProbe::block(block.key(), top));

            if let Block::Stats { counters, .. } = block {
                for counter in counters {
                    let target = slide.counter_targets.get(&counter.key).copied();
                    probes.push(RevealProbe::counter(counter.key.clone(), top, target));
                }
            }
        }
        probes
    }

    fn apply_visual(&mut self, visual: &CardVisual) {
        if let Some(slide) = self.slides.get_mut(visual.ordinal) {
            slide.visual = Some(visual.clone());
        }
    }

    fn mark_revealed(&mut self, ordinal: usize, key: &str) {
        if let Some(slide) = self.slides.get_mut(ordinal) {
            slide.revealed.insert(key.to_string());
        }
    }

    fn set_counter_value(&mut self, ordinal: usize, key: &str, value: u64) {
        if let Some(slide) = self.slides.get_mut(ordinal) {
            slide.counter_values.insert(key.to_string(), value);
        }
    }

    fn set_counter_target(&mut self, key: &str, target: u64) -> bool {
        let mut found = false;
        for slide in &mut self.slides {
            if slide.content.counter_keys().any(|k| k == key) {
                slide.counter_targets.insert(key.to_string(), target);
                found = true;
            }
        }
        trace!(counter = key, target, found, "counter target set");
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CounterSpec;

    fn surface() -> EguiSurface {
        EguiSurface::new(vec![
            SlideContent::new("home", "Home"),
            SlideContent::new("stats", "Stats")
                .with_block(Block::Text {
                    key: "intro".into(),
                    text: "numbers".into(),
                })
                .with_block(Block::Stats {
                    key: "row".into(),
                    counters: vec![
                        CounterSpec {
                            key: "repos".into(),
                            label: "Repositories".into(),
                            target: None,
                        },
                        CounterSpec {
                            key: "solved".into(),
                            label: "Solved".into(),
                            target: Some(140),
                        },
                    ],
                }),
        ])
    }

    fn tops(pairs: &[(&str, f32)]) -> AHashMap<String, f32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_unpainted_slide_has_no_metrics() {
        let surface = surface();
        assert_eq!(surface.slide_count(), 2);
        assert_eq!(surface.scroll_metrics(1), None);
        assert!(surface.revealables(1).is_empty());
        assert_eq!(surface.ordinal_of("stats"), Some(1));
    }

    #[test]
    fn test_record_paint_reports_scroll_movement() {
        let mut surface = surface();
        let metrics = ScrollMetrics::new(0.0, 1200.0, 600.0);
        assert!(!surface.record_paint(1, metrics, tops(&[("intro", 10.0)])));
        assert!(!surface.record_paint(1, metrics, tops(&[("intro", 10.0)])));
        assert!(surface.record_paint(1, ScrollMetrics::new(40.0, 1200.0, 600.0), tops(&[("intro", -30.0)])));
        assert!(!surface.record_paint(9, metrics, AHashMap::default()));
    }

    #[test]
    fn test_unscrollable_slide_keeps_no_metrics() {
        let mut surface = EguiSurface::new(vec![SlideContent {
            scrollable: false,
            ..SlideContent::new("hero", "Hi")
        }]);
        surface.record_paint(0, ScrollMetrics::new(0.0, 100.0, 600.0), AHashMap::default());
        assert_eq!(surface.scroll_metrics(0), None);
    }

    #[test]
    fn test_counter_probes_carry_targets() {
        let mut surface = surface();
        surface.record_paint(
            1,
            ScrollMetrics::new(0.0, 1200.0, 600.0),
            tops(&[("intro", 10.0), ("row", 200.0)]),
        );

        let probes = surface.revealables(1);
        assert_eq!(probes.len(), 4);
        assert_eq!(probes[2], RevealProbe::counter("repos", 200.0, None));
        assert_eq!(probes[3], RevealProbe::counter("solved", 200.0, Some(140)));

        assert!(surface.set_counter_target("repos", 32));
        assert!(!surface.set_counter_target("unknown", 1));
        assert_eq!(surface.revealables(1)[2].counter_target, Some(32));
    }

    #[test]
    fn test_unscrollable_slide_shows_blocks_without_reveal() {
        let mut surface = EguiSurface::new(vec![
            SlideContent {
                scrollable: false,
                ..SlideContent::new("contact", "Say hello")
            }
            .with_block(Block::Text {
                key: "links".into(),
                text: "mail me".into(),
            }),
            SlideContent::new("about", "About").with_block(Block::Text {
                key: "story".into(),
                text: "once".into(),
            }),
        ]);
        surface.record_paint(0, ScrollMetrics::new(0.0, 100.0, 600.0), tops(&[("links", 10.0)]));

        let mut deck = folio_core::Deck::new(surface, folio_core::DeckConfig::default(), 0);
        deck.tick(1_000);

        let contact = deck.surface().slide(0).unwrap();
        assert!(!contact.is_revealed("links"));
        assert!(contact.shows_block("links"));

        // Scrollable slides still wait for the reveal
        assert!(!deck.surface().slide(1).unwrap().shows_block("story"));
    }

    #[test]
    fn test_counter_text() {
        let mut surface = surface();
        let slide = surface.slide(1).unwrap();
        assert_eq!(slide.counter_text("repos"), "-");
        assert_eq!(slide.counter_text("solved"), "140");

        surface.set_counter_value(1, "solved", 12);
        assert_eq!(surface.slide(1).unwrap().counter_text("solved"), "12");
    }
}
