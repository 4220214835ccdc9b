//! Widget ids for per-slide widgets
//!
//! Every card paints its own scroll region, so ids must carry the slide id to
//! keep egui's per-widget state apart.

use egui::{Id, ScrollArea};
use std::fmt::Display;

/// Widget ID builder that ensures unique IDs by combining multiple components
pub struct WidgetId {
    components: Vec<String>,
}

impl WidgetId {
    pub fn new(base: impl Display) -> Self {
        Self {
            components: vec![base.to_string()],
        }
    }

    /// Id rooted at a slide
    pub fn slide(slide_id: &str) -> Self {
        Self::new("slide").with(slide_id)
    }

    pub fn with(mut self, component: impl Display) -> Self {
        self.components.push(component.to_string());
        self
    }

    pub fn build(&self) -> String {
        self.components.join("_")
    }

    pub fn id(&self) -> Id {
        Id::new(self.build())
    }
}

/// Extension trait for ScrollArea to easily add unique IDs
pub trait ScrollAreaExt {
    fn id_builder(self, builder: WidgetId) -> Self;
}

impl ScrollAreaExt for ScrollArea {
    fn id_builder(self, builder: WidgetId) -> Self {
        self.id_source(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_id_builder() {
        let id = WidgetId::slide("projects").with("card").with(2).build();
        assert_eq!(id, "slide_projects_card_2");
    }

    #[test]
    fn test_ids_differ_per_slide() {
        assert_ne!(
            WidgetId::slide("home").with("scroll").id(),
            WidgetId::slide("about").with("scroll").id()
        );
    }
}
