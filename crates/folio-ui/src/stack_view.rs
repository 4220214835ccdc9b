//! Card stack painter
//!
//! Paints every visible card in stacking order using the visual state the deck
//! wrote to the [`EguiSurface`]. Only the active card gets a live scroll
//! region; its geometry and block positions are recorded back on the surface so
//! the deck can run gestures and reveals against what is actually on screen.

use ahash::AHashMap;
use egui::{Align2, FontId, Pos2, Rect, RichText, Rounding, ScrollArea, Sense, Shape, Stroke, Ui, Vec2};
use folio_core::{CardRole, CardVisual, PageConfig, PageIndicators, ScrollMetrics};

use crate::content::{Block, SlideContent};
use crate::surface::{EguiSurface, SlideState};
use crate::theme::{faded, Palette, Theme};
use crate::widget_utils::{ScrollAreaExt, WidgetId};

/// Stack painter configuration
#[derive(Debug, Clone)]
pub struct StackViewConfig {
    /// Gap between the cards and the panel edge
    pub margin: f32,

    /// How far each upcoming card peeks out below the one in front
    pub peek: f32,

    /// Seconds for a card to settle into a new visual state
    pub transition_secs: f32,

    /// Seconds for a revealed block to fade in
    pub reveal_secs: f32,

    pub rounding: f32,
}

impl Default for StackViewConfig {
    fn default() -> Self {
        Self {
            margin: 24.0,
            peek: 14.0,
            transition_secs: 0.45,
            reveal_secs: 0.6,
            rounding: 14.0,
        }
    }
}

/// What happened inside the stack this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackResponse {
    /// Slides whose content scrolled since the last frame
    pub scrolled: Vec<usize>,
}

/// Animated card placement for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    rect: Rect,
    opacity: f32,
}

pub struct StackView {
    config: StackViewConfig,
}

impl StackView {
    pub fn new(config: StackViewConfig) -> Self {
        Self { config }
    }

    pub fn show(
        &self,
        ui: &mut Ui,
        surface: &mut EguiSurface,
        theme: &Theme,
        page: &PageConfig,
        indicators: &PageIndicators,
    ) -> StackResponse {
        let palette = theme.palette();
        let (area, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let mut response = StackResponse::default();

        let mut order: Vec<CardVisual> = surface.slides().iter().filter_map(|s| s.visual.clone()).collect();
        order.sort_by_key(|v| v.z_index);
        let current = order
            .iter()
            .find(|v| v.role == CardRole::Active)
            .map(|v| v.ordinal)
            .unwrap_or(0);

        let mut painted = Vec::new();
        for visual in &order {
            let Some(slide) = surface.slide(visual.ordinal) else {
                continue;
            };
            let placement = self.place(ui, area, visual, current, &slide.content.id, page);
            if placement.opacity <= 0.01 || !placement.rect.intersects(area) {
                continue;
            }

            self.paint_card(ui, placement, &palette);

            let id_source = WidgetId::slide(&slide.content.id).build();
            let inner = placement.rect.shrink(self.config.margin);
            let mut child = ui.child_ui_with_id_source(inner, *ui.layout(), id_source);
            child.set_clip_rect(placement.rect.intersect(area));
            child.visuals_mut().override_text_color = Some(faded(palette.text, placement.opacity));

            if visual.interactive {
                let (metrics, tops) = self.show_active(&mut child, slide, &palette, page, indicators, placement.opacity);
                painted.push((visual.ordinal, metrics, tops));
            } else {
                self.show_preview(&mut child, &slide.content, &palette, placement.opacity);
            }
        }

        for (ordinal, metrics, tops) in painted {
            if surface.record_paint(ordinal, metrics, tops) {
                response.scrolled.push(ordinal);
            }
            if let Some(slide) = surface.slide_mut(ordinal) {
                slide.scroll_to_top = false;
            }
        }

        response
    }

    fn place(
        &self,
        ui: &Ui,
        area: Rect,
        visual: &CardVisual,
        current: usize,
        slide_id: &str,
        page: &PageConfig,
    ) -> Placement {
        let ctx = ui.ctx();
        let secs = if page.reduce_motion { 0.0 } else { self.config.transition_secs };
        let id = |part: &str| WidgetId::slide(slide_id).with(part).id();

        let peek = match visual.role {
            CardRole::Upcoming => (visual.ordinal - current) as f32 * self.config.peek,
            _ => 0.0,
        };
        let scale = ctx.animate_value_with_time(id("scale"), visual.scale, secs);
        let opacity = ctx.animate_value_with_time(id("opacity"), visual.opacity, secs);
        let shift = ctx.animate_value_with_time(id("translate"), visual.translate * area.height() + peek, secs);

        let stack_room = self.config.peek * 3.0;
        let base = Rect::from_min_max(
            area.min + Vec2::splat(self.config.margin),
            Pos2::new(area.max.x - self.config.margin, area.max.y - self.config.margin - stack_room),
        );

        Placement {
            rect: Rect::from_center_size(base.center() + Vec2::new(0.0, shift), base.size() * scale),
            opacity,
        }
    }

    fn paint_card(&self, ui: &Ui, placement: Placement, palette: &Palette) {
        let rounding = Rounding::same(self.config.rounding);
        let painter = ui.painter();
        painter.rect_filled(
            placement.rect.translate(Vec2::new(0.0, 6.0)),
            rounding,
            faded(palette.shadow, placement.opacity),
        );
        painter.rect(
            placement.rect,
            rounding,
            faded(palette.card, placement.opacity),
            Stroke::new(1.0, faded(palette.card_stroke, placement.opacity)),
        );
    }

    /// Title card for slides stacked behind the active one
    fn show_preview(&self, ui: &mut Ui, content: &SlideContent, palette: &Palette, opacity: f32) {
        ui.heading(&content.title);
        if let Some(subtitle) = &content.subtitle {
            ui.label(RichText::new(subtitle).color(faded(palette.text_secondary, opacity)));
        }
    }

    fn show_active(
        &self,
        ui: &mut Ui,
        slide: &SlideState,
        palette: &Palette,
        page: &PageConfig,
        indicators: &PageIndicators,
        opacity: f32,
    ) -> (ScrollMetrics, AHashMap<String, f32>) {
        if !slide.content.scrollable {
            let tops = self.show_content(ui, slide, palette, page, indicators, opacity);
            let height = ui.min_rect().height();
            return (ScrollMetrics::new(0.0, height, ui.max_rect().height()), tops);
        }

        let mut scroll = ScrollArea::vertical()
            .id_builder(WidgetId::slide(&slide.content.id).with("scroll"))
            .auto_shrink([false, false]);
        if slide.scroll_to_top {
            scroll = scroll.vertical_scroll_offset(0.0);
        }

        let output = scroll.show(ui, |ui| self.show_content(ui, slide, palette, page, indicators, opacity));
        let offset = output.state.offset.y;

        // Block tops relative to the visible region
        let tops = output.inner.into_iter().map(|(key, top)| (key, top - offset)).collect();
        let metrics = ScrollMetrics::new(offset, output.content_size.y, output.inner_rect.height());
        (metrics, tops)
    }

    /// Header and blocks; returns each block's top relative to the content origin
    fn show_content(
        &self,
        ui: &mut Ui,
        slide: &SlideState,
        palette: &Palette,
        page: &PageConfig,
        indicators: &PageIndicators,
        opacity: f32,
    ) -> AHashMap<String, f32> {
        let origin = ui.cursor().top();
        let content = &slide.content;

        if content.hero {
            let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), 64.0), Sense::hover());
            ui.painter().text(
                rect.left_top() + Vec2::new(0.0, indicators.parallax_offset),
                Align2::LEFT_TOP,
                &content.title,
                FontId::proportional(44.0),
                faded(palette.text, opacity),
            );
        } else {
            ui.heading(&content.title);
        }
        if let Some(subtitle) = &content.subtitle {
            ui.label(RichText::new(subtitle).color(faded(palette.text_secondary, opacity)));
        }
        ui.add_space(12.0);

        let secs = if page.reduce_motion { 0.0 } else { self.config.reveal_secs };
        let mut tops = AHashMap::default();
        for block in &content.blocks {
            tops.insert(block.key().to_string(), ui.cursor().top() - origin);

            let id = WidgetId::slide(&content.id).with(block.key()).with("reveal").id();
            let shown = ui.ctx().animate_bool_with_time(id, slide.shows_block(block.key()), secs);
            let alpha = shown * opacity;

            ui.scope(|ui| {
                ui.visuals_mut().override_text_color = Some(faded(palette.text, alpha));
                self.show_block(ui, block, slide, palette, page, alpha);
            });
            ui.add_space(16.0);
        }
        tops
    }

    fn show_block(&self, ui: &mut Ui, block: &Block, slide: &SlideState, palette: &Palette, page: &PageConfig, alpha: f32) {
        match block {
            Block::Text { text, .. } => {
                ui.label(text);
            }
            Block::Heading { text, .. } => {
                ui.label(RichText::new(text).size(22.0).strong());
            }
            Block::Card { title, body, tags, .. } => {
                self.show_project_card(ui, title, body, tags, palette, page, alpha);
            }
            Block::Stats { counters, .. } => {
                ui.horizontal_wrapped(|ui| {
                    for counter in counters {
                        ui.vertical(|ui| {
                            ui.label(
                                RichText::new(slide.counter_text(&counter.key))
                                    .size(34.0)
                                    .strong()
                                    .color(faded(palette.accent, alpha)),
                            );
                            ui.label(RichText::new(&counter.label).color(faded(palette.text_secondary, alpha)));
                        });
                        ui.add_space(24.0);
                    }
                });
            }
            Block::Links { links, .. } => {
                ui.horizontal_wrapped(|ui| {
                    for link in links {
                        ui.hyperlink_to(RichText::new(&link.label).color(faded(palette.accent, alpha)), &link.url);
                        if let Some(address) = link.email() {
                            if ui.small_button("📋").on_hover_text("Copy address").clicked() {
                                ui.output_mut(|o| o.copied_text = address.to_string());
                            }
                        }
                    }
                });
            }
        }
    }

    /// Project card that leans toward the pointer
    #[allow(clippy::too_many_arguments)]
    fn show_project_card(
        &self,
        ui: &mut Ui,
        title: &str,
        body: &str,
        tags: &[String],
        palette: &Palette,
        page: &PageConfig,
        alpha: f32,
    ) {
        let background = ui.painter().add(Shape::Noop);
        let inner = ui
            .vertical(|ui| {
                ui.add_space(12.0);
                ui.indent("card", |ui| {
                    ui.label(RichText::new(title).size(18.0).strong());
                    ui.label(body);
                    if !tags.is_empty() {
                        ui.label(RichText::new(tags.join(" · ")).small().color(faded(palette.text_secondary, alpha)));
                    }
                });
                ui.add_space(12.0);
            })
            .response;

        let rect = inner.rect;
        let lean = match ui.ctx().pointer_hover_pos().filter(|p| rect.contains(*p)) {
            Some(pointer) => {
                let local = pointer - rect.min;
                let tilt = folio_core::page::tilt(local.x, local.y, rect.width(), rect.height(), page);
                Vec2::new(tilt.rotate_y, -tilt.rotate_x)
            }
            None => Vec2::ZERO,
        };

        ui.painter().set(
            background,
            Shape::rect_filled(
                rect.translate(lean),
                Rounding::same(8.0),
                faded(palette.background, alpha),
            ),
        );
    }
}

impl Default for StackView {
    fn default() -> Self {
        Self::new(StackViewConfig::default())
    }
}
