//! Page effects for the active slide
//!
//! Scroll progress, the back-to-top control, hero parallax, pointer tilt and
//! theme resolution. All pure functions of geometry and settings.

use serde::{Deserialize, Serialize};

use crate::config::PageConfig;
use crate::surface::ScrollMetrics;

/// Indicators derived from the active slide's scroll position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PageIndicators {
    /// Percentage of the content scrolled, 0 to 100
    pub progress_pct: f32,

    /// Whether the back-to-top control is shown
    pub show_back_to_top: bool,

    /// Vertical hero offset
    pub parallax_offset: f32,
}

impl PageIndicators {
    /// Indicators for a slide; a slide without a scroll region reports zeros
    pub fn from_metrics(metrics: Option<ScrollMetrics>, config: &PageConfig) -> Self {
        let Some(metrics) = metrics else {
            return Self::default();
        };

        Self {
            progress_pct: scroll_progress(&metrics),
            show_back_to_top: metrics.offset > config.back_to_top_threshold,
            parallax_offset: parallax_offset(metrics.offset, config),
        }
    }
}

/// Share of the scrollable distance covered, in percent
pub fn scroll_progress(metrics: &ScrollMetrics) -> f32 {
    let scrollable = metrics.content_height - metrics.viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (metrics.offset / scrollable * 100.0).clamp(0.0, 100.0)
}

/// Hero offset for a scroll position; zero when motion is reduced
pub fn parallax_offset(scrolled: f32, config: &PageConfig) -> f32 {
    if config.reduce_motion {
        return 0.0;
    }
    scrolled * config.parallax_factor
}

/// Rotation in degrees for a card following the pointer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tilt {
    /// Rotation around the horizontal axis
    pub rotate_x: f32,

    /// Rotation around the vertical axis
    pub rotate_y: f32,
}

/// Tilt for a pointer at (`x`, `y`) inside a `width` by `height` card
///
/// Coordinates are relative to the card's top-left corner.
pub fn tilt(x: f32, y: f32, width: f32, height: f32, config: &PageConfig) -> Tilt {
    if config.reduce_motion || width <= 0.0 || height <= 0.0 {
        return Tilt::default();
    }

    Tilt {
        rotate_x: (y / height - 0.5) * -config.tilt_degrees,
        rotate_y: (x / width - 0.5) * config.tilt_degrees,
    }
}

/// Color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// A saved choice wins over the system preference
    pub fn resolve(saved: Option<ThemeMode>, prefers_dark: bool) -> Self {
        saved.unwrap_or(if prefers_dark { ThemeMode::Dark } else { ThemeMode::Light })
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }
}
