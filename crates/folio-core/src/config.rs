//! Deck configuration
//!
//! Every tunable of the card stack lives here: transition cooldown, stacking
//! steps, gesture thresholds, reveal margin and counter timing. Files are JSON
//! and every section falls back to its defaults, so a partial file is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Full deck configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Transition timing
    pub navigation: NavigationConfig,

    /// Visual stacking of upcoming cards
    pub stack: StackStyle,

    /// Wheel and swipe interpretation
    pub gesture: GestureConfig,

    /// Reveal and counter animation
    pub reveal: RevealConfig,

    /// Page effects for the active slide
    pub page: PageConfig,

    /// Slide whose activation asks the statistics collaborator for counter targets
    pub stats_slide: Option<String>,
}

/// Transition timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Lock window after a transition starts
    pub cooldown_ms: u64,

    /// Delay before the newly active slide is checked for reveals
    pub reveal_delay_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 800,
            reveal_delay_ms: 300,
        }
    }
}

/// Stacking parameters for upcoming cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackStyle {
    /// Scale lost per step behind the active card
    pub scale_step: f32,

    /// Opacity lost per step behind the active card
    pub opacity_step: f32,

    /// Deepest offset still rendered; anything further is hidden
    pub max_visible_offset: usize,

    /// Stacking order of the active card
    pub active_z: i32,

    /// Clamp computed opacity at zero
    pub clamp_opacity: bool,
}

impl Default for StackStyle {
    fn default() -> Self {
        Self {
            scale_step: 0.05,
            opacity_step: 0.2,
            max_visible_offset: 3,
            active_z: 10,
            clamp_opacity: true,
        }
    }
}

/// Gesture thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Slack when deciding the content is scrolled to its end
    pub bottom_tolerance: f32,

    /// Minimum vertical travel for a swipe
    pub swipe_threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            bottom_tolerance: 5.0,
            swipe_threshold: 50.0,
        }
    }
}

/// Reveal and counter animation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Distance above the bottom of the viewport an element must cross
    pub reveal_margin: f32,

    /// Total counter animation time
    pub counter_duration_ms: u64,

    /// Counter tick interval
    pub counter_tick_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            reveal_margin: 80.0,
            counter_duration_ms: 2000,
            counter_tick_ms: 16,
        }
    }
}

/// Page effect settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Scroll distance after which the back-to-top control shows
    pub back_to_top_threshold: f32,

    /// Hero offset per scrolled unit
    pub parallax_factor: f32,

    /// Full tilt range in degrees
    pub tilt_degrees: f32,

    /// Disable motion effects
    pub reduce_motion: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            back_to_top_threshold: 400.0,
            parallax_factor: 0.1,
            tilt_degrees: 6.0,
            reduce_motion: false,
        }
    }
}

impl DeckConfig {
    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Parse and validate a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: DeckConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the deck cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("stack.scale_step", self.stack.scale_step),
            ("stack.opacity_step", self.stack.opacity_step),
            ("gesture.bottom_tolerance", self.gesture.bottom_tolerance),
            ("gesture.swipe_threshold", self.gesture.swipe_threshold),
            ("reveal.reveal_margin", self.reveal.reveal_margin),
            ("page.back_to_top_threshold", self.page.back_to_top_threshold),
            ("page.parallax_factor", self.page.parallax_factor),
            ("page.tilt_degrees", self.page.tilt_degrees),
        ];

        for (name, value) in floats {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{} must be finite", name)));
            }
            if value < 0.0 {
                return Err(ConfigError::Invalid(format!("{} must not be negative", name)));
            }
        }

        // The deepest visible upcoming card must keep a positive size
        let smallest = 1.0 - self.stack.scale_step * self.stack.max_visible_offset as f32;
        if smallest <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "stack.scale_step ({}) shrinks card {} to nothing",
                self.stack.scale_step, self.stack.max_visible_offset
            )));
        }

        if self.reveal.counter_tick_ms == 0 {
            return Err(ConfigError::Invalid("reveal.counter_tick_ms must be positive".to_string()));
        }

        if self.reveal.counter_duration_ms < self.reveal.counter_tick_ms {
            return Err(ConfigError::Invalid(format!(
                "reveal.counter_duration_ms ({}) is shorter than one tick ({})",
                self.reveal.counter_duration_ms, self.reveal.counter_tick_ms
            )));
        }

        Ok(())
    }
}
