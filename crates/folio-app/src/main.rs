//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use eframe::egui::{self, CentralPanel, Context, Event, Key, TopBottomPanel, TouchPhase};
use parking_lot::RwLock;
use tracing::{info, warn};

use folio_core::events::{events::StatsRequested, typed_handler};
use folio_core::{CounterTarget, Deck, StatsSource, ThemeMode};
use folio_ui::{apply_theme, EguiSurface, NavBar, NavBarResponse, StackView, Theme};

mod portfolio;
mod stats;

use portfolio::Manifest;

/// Input gathered from one egui frame
#[derive(Debug, Default)]
struct FrameInput {
    /// Wheel delta, positive toward the end of the content
    wheel: f32,
    touches: Vec<(TouchPhase, f32)>,
    forward: bool,
    back: bool,
}

/// Main application state
struct PortfolioApp {
    deck: Deck<EguiSurface>,
    stack: StackView,

    /// Nav bar, also subscribed to the navigation engine
    nav_bar: Arc<NavBar>,

    theme: Theme,

    /// Counter targets fetched in the background, applied on the next frame
    inbox: Arc<RwLock<Vec<CounterTarget>>>,

    /// Tokio runtime for the statistics fetch
    _runtime: tokio::runtime::Runtime,
}

impl PortfolioApp {
    fn new(cc: &eframe::CreationContext<'_>, manifest: Manifest, runtime: tokio::runtime::Runtime) -> Self {
        let prefers_dark = !matches!(cc.integration_info.system_theme, Some(eframe::Theme::Light));
        let theme = Theme::new(ThemeMode::resolve(manifest.theme, prefers_dark));
        apply_theme(&cc.egui_ctx, &theme);

        let nav_bar = Arc::new(NavBar::new(&manifest.slides));
        let surface = EguiSurface::new(manifest.slides);
        let deck = Deck::new(surface, manifest.deck, now_ms(&cc.egui_ctx));
        deck.navigation().add_subscriber(nav_bar.clone());

        // Fetch counter targets the first time the stats slide is shown
        let inbox = Arc::new(RwLock::new(Vec::new()));
        let source: Arc<dyn StatsSource> = Arc::from(stats::source_for(&manifest.stats));
        let handle = runtime.handle().clone();
        let ctx = cc.egui_ctx.clone();
        let fetched = inbox.clone();
        deck.event_bus().subscribe::<StatsRequested>(typed_handler(move |event: &StatsRequested| {
            info!(slide = %event.slide_id, source = source.source_name(), "fetching counter targets");
            let source = source.clone();
            let fetched = fetched.clone();
            let ctx = ctx.clone();
            handle.spawn(async move {
                match source.counter_targets().await {
                    Ok(targets) => fetched.write().extend(targets),
                    Err(e) => warn!("Counter targets unavailable: {:#}", e),
                }
                ctx.request_repaint();
            });
        }));

        Self {
            deck,
            stack: StackView::default(),
            nav_bar,
            theme,
            inbox,
            _runtime: runtime,
        }
    }

    fn read_input(ctx: &Context) -> FrameInput {
        ctx.input(|i| FrameInput {
            wheel: -i.scroll_delta.y,
            touches: i
                .events
                .iter()
                .filter_map(|event| match event {
                    Event::Touch { phase, pos, .. } => Some((*phase, pos.y)),
                    _ => None,
                })
                .collect(),
            forward: i.key_pressed(Key::ArrowDown) || i.key_pressed(Key::PageDown),
            back: i.key_pressed(Key::ArrowUp) || i.key_pressed(Key::PageUp),
        })
    }

    fn handle_input(&mut self, ctx: &Context, now_ms: u64) {
        let input = Self::read_input(ctx);

        if input.wheel != 0.0 {
            let outcome = self.deck.on_wheel(input.wheel, now_ms);
            if outcome.consumed {
                // The deck took the wheel; keep it away from the scroll region
                ctx.input_mut(|i| i.scroll_delta = egui::Vec2::ZERO);
            }
        }

        for (phase, y) in input.touches {
            match phase {
                TouchPhase::Start => self.deck.on_touch_start(y),
                TouchPhase::End => {
                    self.deck.on_touch_end(y, now_ms);
                }
                TouchPhase::Cancel => self.deck.on_touch_cancel(),
                TouchPhase::Move => {}
            }
        }

        let current = self.deck.current_index();
        if input.forward {
            self.deck.go_to(current + 1, now_ms);
        } else if input.back {
            if let Some(target) = current.checked_sub(1) {
                self.deck.go_to(target, now_ms);
            }
        }
    }

    fn handle_nav(&mut self, ctx: &Context, response: NavBarResponse, now_ms: u64) {
        if let Some(slide_id) = response.clicked {
            self.deck.go_to_id(&slide_id, now_ms);
        }
        if response.back_to_top {
            let current = self.deck.current_index();
            self.deck.surface_mut().request_scroll_to_top(current);
        }
        if response.theme_toggled {
            self.theme.toggle();
            apply_theme(ctx, &self.theme);
        }
    }

    /// Hand fetched counter targets to the deck
    fn drain_stats(&mut self, now_ms: u64) {
        let targets: Vec<CounterTarget> = self.inbox.write().drain(..).collect();
        for target in targets {
            if !self.deck.set_counter_target(&target.key, target.value, now_ms) {
                warn!(counter = %target.key, "No counter element for target");
            }
        }
    }
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = now_ms(ctx);

        self.drain_stats(now);
        self.handle_input(ctx, now);
        self.deck.tick(now);

        let indicators = self.deck.page_indicators();
        let nav = TopBottomPanel::top("nav_bar")
            .show(ctx, |ui| self.nav_bar.ui(ui, &indicators, &self.theme))
            .inner;
        self.handle_nav(ctx, nav, now);

        let page = self.deck.config().page.clone();
        let stack = CentralPanel::default()
            .show(ctx, |ui| {
                self.stack
                    .show(ui, self.deck.surface_mut(), &self.theme, &page, &indicators)
            })
            .inner;
        for ordinal in stack.scrolled {
            self.deck.on_content_scroll(ordinal, now);
        }

        if let Some(deadline) = self.deck.next_wakeup() {
            ctx.request_repaint_after(Duration::from_millis(deadline.saturating_sub(now)));
        }
    }
}

impl Drop for PortfolioApp {
    fn drop(&mut self) {
        self.deck.teardown();
    }
}

/// Host clock in milliseconds since start
fn now_ms(ctx: &Context) -> u64 {
    (ctx.input(|i| i.time) * 1000.0) as u64
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let manifest = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "Loading portfolio manifest");
            Manifest::load(&path)?
        }
        None => Manifest::builtin(),
    };
    info!(slides = manifest.slides.len(), "Starting {}", manifest.title);

    let runtime = tokio::runtime::Runtime::new()?;
    let title = manifest.title.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([640.0, 480.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Box::new(PortfolioApp::new(cc, manifest, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
