//! Slide container abstraction
//!
//! The deck never draws. It reads scroll geometry and element positions from a
//! [`SlideSurface`] and writes computed visual state back to it.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::navigation::CardVisual;

/// Geometry of a slide's scrollable region
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top
    pub offset: f32,

    /// Full height of the scrolled content
    pub content_height: f32,

    /// Visible height of the region
    pub viewport_height: f32,
}

impl ScrollMetrics {
    pub fn new(offset: f32, content_height: f32, viewport_height: f32) -> Self {
        Self {
            offset,
            content_height,
            viewport_height,
        }
    }

    /// Scrolled all the way up
    pub fn at_top(&self) -> bool {
        self.offset <= 0.0
    }

    /// Scrolled to the end, within `tolerance` to absorb sub-pixel rounding
    pub fn at_bottom(&self, tolerance: f32) -> bool {
        self.offset + self.viewport_height >= self.content_height - tolerance
    }

    /// How far the content can scroll
    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }
}

/// Position of one revealable element inside a slide's scroll region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealProbe {
    /// Key unique within the slide
    pub key: String,

    /// Top edge relative to the top of the visible region
    pub top: f32,

    /// Set for counter elements once their target is known
    pub counter_target: Option<u64>,

    /// Whether this element belongs to the counter category
    pub is_counter: bool,
}

impl RevealProbe {
    /// A plain revealable block
    pub fn block(key: impl Into<String>, top: f32) -> Self {
        Self {
            key: key.into(),
            top,
            counter_target: None,
            is_counter: false,
        }
    }

    /// A counter element with an optional known target
    pub fn counter(key: impl Into<String>, top: f32, target: Option<u64>) -> Self {
        Self {
            key: key.into(),
            top,
            counter_target: target,
            is_counter: true,
        }
    }
}

/// Ordered collection of addressable slide containers
pub trait SlideSurface {
    /// Number of slides, fixed for the life of the surface
    fn slide_count(&self) -> usize;

    /// Identifier of the slide at `ordinal`
    fn slide_id(&self, ordinal: usize) -> Option<&str>;

    /// Geometry of the slide's scrollable region; `None` if it has none
    fn scroll_metrics(&self, ordinal: usize) -> Option<ScrollMetrics>;

    /// Revealable elements of the slide with their current positions
    fn revealables(&self, ordinal: usize) -> Vec<RevealProbe>;

    /// Apply computed transform, opacity, stacking and role
    fn apply_visual(&mut self, visual: &CardVisual);

    /// Turn on the revealed state of an element
    fn mark_revealed(&mut self, ordinal: usize, key: &str);

    /// Show a counter value
    fn set_counter_value(&mut self, ordinal: usize, key: &str, value: u64);

    /// Record the target of every counter element with this key; false if none matched
    fn set_counter_target(&mut self, key: &str, target: u64) -> bool;

    /// Ordinal of the slide with identifier `id`
    fn ordinal_of(&self, id: &str) -> Option<usize> {
        (0..self.slide_count()).find(|&ordinal| self.slide_id(ordinal) == Some(id))
    }
}

/// One slide held by [`MemorySurface`]
#[derive(Debug, Clone, Default)]
pub struct MemorySlide {
    pub id: String,
    pub metrics: Option<ScrollMetrics>,
    pub probes: Vec<RevealProbe>,
    pub visual: Option<CardVisual>,
    pub revealed: Vec<String>,
    pub counter_values: AHashMap<String, u64>,
}

impl MemorySlide {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_metrics(mut self, metrics: ScrollMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_probe(mut self, probe: RevealProbe) -> Self {
        self.probes.push(probe);
        self
    }

    pub fn is_revealed(&self, key: &str) -> bool {
        self.revealed.iter().any(|k| k == key)
    }
}

/// Headless surface that keeps everything in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    pub slides: Vec<MemorySlide>,
}

impl MemorySurface {
    pub fn new(slides: Vec<MemorySlide>) -> Self {
        Self { slides }
    }

    /// Surface with `count` slides named `slide-0`, `slide-1`, ...
    pub fn with_count(count: usize) -> Self {
        Self::new((0..count).map(|i| MemorySlide::new(format!("slide-{}", i))).collect())
    }

    pub fn slide(&self, ordinal: usize) -> &MemorySlide {
        &self.slides[ordinal]
    }

    pub fn slide_mut(&mut self, ordinal: usize) -> &mut MemorySlide {
        &mut self.slides[ordinal]
    }
}

impl SlideSurface for MemorySurface {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn slide_id(&self, ordinal: usize) -> Option<&str> {
        self.slides.get(ordinal).map(|s| s.id.as_str())
    }

    fn scroll_metrics(&self, ordinal: usize) -> Option<ScrollMetrics> {
        self.slides.get(ordinal).and_then(|s| s.metrics)
    }

    fn revealables(&self, ordinal: usize) -> Vec<RevealProbe> {
        self.slides.get(ordinal).map(|s| s.probes.clone()).unwrap_or_default()
    }

    fn apply_visual(&mut self, visual: &CardVisual) {
        if let Some(slide) = self.slides.get_mut(visual.ordinal) {
            slide.visual = Some(visual.clone());
        }
    }

    fn mark_revealed(&mut self, ordinal: usize, key: &str) {
        if let Some(slide) = self.slides.get_mut(ordinal) {
            if !slide.is_revealed(key) {
                slide.revealed.push(key.to_string());
            }
        }
    }

    fn set_counter_value(&mut self, ordinal: usize, key: &str, value: u64) {
        if let Some(slide) = self.slides.get_mut(ordinal) {
            slide.counter_values.insert(key.to_string(), value);
        }
    }

    fn set_counter_target(&mut self, key: &str, target: u64) -> bool {
        let mut matched = false;
        for probe in self.slides.iter_mut().flat_map(|s| s.probes.iter_mut()) {
            if probe.is_counter && probe.key == key {
                probe.counter_target = Some(target);
                matched = true;
            }
        }
        matched
    }
}
