use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use folio_core::ThemeMode;
use std::collections::BTreeMap;

/// Theme configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub mode: ThemeMode,
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        Self { mode }
    }

    pub fn toggle(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.mode)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeMode::Dark)
    }
}

/// Colors used by the cards and the nav bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub card: Color32,
    pub card_stroke: Color32,
    pub text: Color32,
    pub text_secondary: Color32,
    pub accent: Color32,
    pub shadow: Color32,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                background: Color32::from_rgb(17, 17, 20),
                card: Color32::from_rgb(31, 31, 36),
                card_stroke: Color32::from_rgb(60, 60, 68),
                text: Color32::from_rgb(225, 225, 230),
                text_secondary: Color32::from_rgb(160, 160, 170),
                accent: accent_color(),
                shadow: Color32::from_black_alpha(140),
            },
            ThemeMode::Light => Self {
                background: Color32::from_rgb(238, 238, 242),
                card: Color32::from_rgb(252, 252, 253),
                card_stroke: Color32::from_rgb(210, 210, 218),
                text: Color32::from_rgb(30, 30, 36),
                text_secondary: Color32::from_rgb(95, 95, 110),
                accent: Color32::from_rgb(50, 100, 210),
                shadow: Color32::from_black_alpha(50),
            },
        }
    }
}

/// Apply the application theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let palette = theme.palette();
    let mut style = Style::default();
    let mut visuals = if theme.mode.is_dark() {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    let (widget_bg, hover_color, active_color) = if theme.mode.is_dark() {
        (
            Color32::from_rgb(40, 40, 46),
            Color32::from_rgb(52, 52, 60),
            Color32::from_rgb(64, 64, 72),
        )
    } else {
        (
            Color32::from_rgb(228, 228, 234),
            Color32::from_rgb(214, 214, 222),
            Color32::from_rgb(200, 200, 210),
        )
    };

    // Window and panel styling
    visuals.window_fill = palette.card;
    visuals.panel_fill = palette.background;
    visuals.extreme_bg_color = palette.background;
    visuals.faint_bg_color = widget_bg;

    // Widget styling
    visuals.widgets.noninteractive.bg_fill = palette.card;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, palette.card_stroke);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text);
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);

    visuals.widgets.inactive.bg_fill = widget_bg;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, palette.text);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);

    visuals.widgets.hovered.bg_fill = hover_color;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, palette.text);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);

    visuals.widgets.active.bg_fill = active_color;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, palette.accent);
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, palette.text);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = palette.accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, palette.accent);
    visuals.hyperlink_color = palette.accent;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 4.0);

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(12.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(15.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(30.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Get the accent color for the dark theme
pub fn accent_color() -> Color32 {
    Color32::from_rgb(100, 150, 250)
}

/// Scale a color's alpha by a card's opacity
pub fn faded(color: Color32, opacity: f32) -> Color32 {
    color.linear_multiply(opacity.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_switches_palette() {
        let mut theme = Theme::default();
        let dark = theme.palette();
        theme.toggle();
        assert_eq!(theme.mode, ThemeMode::Light);
        assert_ne!(theme.palette().background, dark.background);
    }

    #[test]
    fn test_faded_clamps_opacity() {
        let color = Color32::from_rgb(200, 100, 50);
        assert_eq!(faded(color, 0.0), Color32::TRANSPARENT);
        assert_eq!(faded(color, 3.0), faded(color, 1.0));
        assert_eq!(faded(color, -1.0), Color32::TRANSPARENT);
    }
}
