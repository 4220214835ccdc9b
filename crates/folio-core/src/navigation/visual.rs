use serde::{Serialize, Deserialize};

use crate::config::StackStyle;

/// Role of a card relative to the active slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardRole {
    /// The slide being presented
    Active,
    /// Already passed; slid out above the active card
    Previous,
    /// Still ahead; stacked behind the active card
    Upcoming,
}

impl CardRole {
    /// Class-style name for surfaces that toggle discrete states
    pub fn as_str(&self) -> &'static str {
        match self {
            CardRole::Active => "active",
            CardRole::Previous => "previous",
            CardRole::Upcoming => "upcoming",
        }
    }
}

/// Computed visual state of one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardVisual {
    /// Position in the deck
    pub ordinal: usize,

    pub role: CardRole,

    /// Uniform scale factor
    pub scale: f32,

    pub opacity: f32,

    /// Stacking order; higher paints on top
    pub z_index: i32,

    /// Whether the card takes pointer input
    pub interactive: bool,

    /// Fully hidden but kept for later
    pub hidden: bool,

    /// Vertical offset as a fraction of the viewport height
    pub translate: f32,
}

/// Visual state of the card at `ordinal` when `current` is active
pub fn card_visual(ordinal: usize, current: usize, style: &StackStyle) -> CardVisual {
    if ordinal == current {
        return CardVisual {
            ordinal,
            role: CardRole::Active,
            scale: 1.0,
            opacity: 1.0,
            z_index: style.active_z,
            interactive: true,
            hidden: false,
            translate: 0.0,
        };
    }

    if ordinal < current {
        return CardVisual {
            ordinal,
            role: CardRole::Previous,
            scale: 1.0,
            opacity: 1.0,
            z_index: style.active_z + (current - ordinal) as i32,
            interactive: false,
            hidden: false,
            translate: -1.0,
        };
    }

    let offset = ordinal - current;
    if offset > style.max_visible_offset {
        return CardVisual {
            ordinal,
            role: CardRole::Upcoming,
            scale: 1.0,
            opacity: 0.0,
            z_index: 0,
            interactive: false,
            hidden: true,
            translate: 0.0,
        };
    }

    let mut opacity = 1.0 - style.opacity_step * offset as f32;
    if style.clamp_opacity {
        opacity = opacity.max(0.0);
    }

    CardVisual {
        ordinal,
        role: CardRole::Upcoming,
        scale: 1.0 - style.scale_step * offset as f32,
        opacity,
        z_index: style.active_z - offset as i32,
        interactive: false,
        hidden: false,
        translate: 0.0,
    }
}

/// Visual state of every card in a deck of `count` slides
pub fn compute_visuals(current: usize, count: usize, style: &StackStyle) -> Vec<CardVisual> {
    (0..count).map(|ordinal| card_visual(ordinal, current, style)).collect()
}
