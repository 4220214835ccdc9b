//! egui surface for the portfolio deck
//!
//! Paints the card stack and the nav bar, and implements the deck's
//! [`folio_core::SlideSurface`] on top of egui's per-frame layout.

pub mod content;
pub mod nav_bar;
pub mod stack_view;
pub mod surface;
pub mod theme;
pub mod widget_utils;

pub use content::{Block, CounterSpec, Link, SlideContent};
pub use nav_bar::{NavBar, NavBarResponse, NavLink};
pub use stack_view::{StackResponse, StackView, StackViewConfig};
pub use surface::{EguiSurface, SlideState};
pub use theme::{apply_theme, Palette, Theme};
pub use widget_utils::{ScrollAreaExt, WidgetId};
