//! Top bar: section links, scroll progress and the theme switch

use egui::{Align, Layout, RichText, Rounding, Sense, Ui};
use folio_core::{NavigationContext, NavigationSubscriber, PageIndicators};
use parking_lot::RwLock;

use crate::content::SlideContent;
use crate::theme::Theme;

/// One nav link
#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub ordinal: usize,
    pub slide_id: String,
    pub label: String,
}

/// What the user did in the bar this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavBarResponse {
    /// Slide id of a clicked link
    pub clicked: Option<String>,
    pub theme_toggled: bool,
    pub back_to_top: bool,
}

/// Nav bar that follows the active slide
///
/// Registered with the navigation engine as a subscriber, so the highlight
/// moves with every accepted transition.
pub struct NavBar {
    links: Vec<NavLink>,
    active: RwLock<usize>,
}

impl NavBar {
    pub fn new(slides: &[SlideContent]) -> Self {
        let links = slides
            .iter()
            .enumerate()
            .filter_map(|(ordinal, slide)| {
                slide.nav_label.as_ref().map(|label| NavLink {
                    ordinal,
                    slide_id: slide.id.clone(),
                    label: label.clone(),
                })
            })
            .collect();

        Self {
            links,
            active: RwLock::new(0),
        }
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    /// Ordinal of the highlighted slide
    pub fn active(&self) -> usize {
        *self.active.read()
    }

    pub fn is_active(&self, link: &NavLink) -> bool {
        link.ordinal == self.active()
    }

    pub fn ui(&self, ui: &mut Ui, indicators: &PageIndicators, theme: &Theme) -> NavBarResponse {
        let palette = theme.palette();
        let mut response = NavBarResponse::default();

        ui.horizontal(|ui| {
            for link in &self.links {
                let text = if self.is_active(link) {
                    RichText::new(&link.label).color(palette.accent).strong()
                } else {
                    RichText::new(&link.label).color(palette.text_secondary)
                };
                if ui.selectable_label(self.is_active(link), text).clicked() {
                    response.clicked = Some(link.slide_id.clone());
                }
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let icon = if theme.mode.is_dark() { "☀" } else { "🌙" };
                if ui.button(icon).on_hover_text("Toggle theme").clicked() {
                    response.theme_toggled = true;
                }
                if indicators.show_back_to_top && ui.button("⬆").on_hover_text("Back to top").clicked() {
                    response.back_to_top = true;
                }
            });
        });

        // Progress strip along the bottom edge
        let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 3.0), Sense::hover());
        let filled = rect.width() * indicators.progress_pct / 100.0;
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, Rounding::ZERO, palette.card_stroke);
        painter.rect_filled(
            egui::Rect::from_min_size(rect.min, egui::vec2(filled, rect.height())),
            Rounding::ZERO,
            palette.accent,
        );

        response
    }
}

impl NavigationSubscriber for NavBar {
    fn on_navigation_change(&self, context: &NavigationContext) {
        *self.active.write() = context.current_index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{DeckConfig, NavigationEngine};
    use std::sync::Arc;

    fn slides() -> Vec<SlideContent> {
        let mut home = SlideContent::new("home", "Home");
        home.nav_label = Some("Home".into());
        let intro = SlideContent::new("intro", "Intro");
        let mut projects = SlideContent::new("projects", "Projects");
        projects.nav_label = Some("Work".into());
        vec![home, intro, projects]
    }

    #[test]
    fn test_only_labelled_slides_are_linked() {
        let bar = NavBar::new(&slides());
        let ids: Vec<_> = bar.links().iter().map(|l| (l.ordinal, l.slide_id.as_str())).collect();
        assert_eq!(ids, vec![(0, "home"), (2, "projects")]);
    }

    #[test]
    fn test_highlight_follows_engine() {
        let config = DeckConfig::default();
        let engine = NavigationEngine::new(3, config.stack.clone(), config.navigation.cooldown_ms);
        let bar = Arc::new(NavBar::new(&slides()));
        engine.add_subscriber(bar.clone());

        engine.go_to(2, 0);
        assert_eq!(bar.active(), 2);
        assert!(bar.is_active(&bar.links()[1]));
        assert!(!bar.is_active(&bar.links()[0]));
    }
}
