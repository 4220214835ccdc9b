//! Slide content model
//!
//! What each card shows. The deck only cares about keys and positions; the
//! painter walks these blocks and reports where each one landed.

use serde::{Deserialize, Serialize};

/// One card of the portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideContent {
    /// Anchor id, also the target of nav links
    pub id: String,

    pub title: String,

    /// Label in the nav bar; slides without one are not linked
    #[serde(default)]
    pub nav_label: Option<String>,

    #[serde(default)]
    pub subtitle: Option<String>,

    /// Title moves with the parallax offset
    #[serde(default)]
    pub hero: bool,

    /// Content sits in a scroll region
    #[serde(default = "default_scrollable")]
    pub scrollable: bool,

    #[serde(default)]
    pub blocks: Vec<Block>,
}

fn default_scrollable() -> bool {
    true
}

impl SlideContent {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            nav_label: None,
            subtitle: None,
            hero: false,
            scrollable: true,
            blocks: Vec::new(),
        }
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Keys of every counter on this slide
    pub fn counter_keys(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().flat_map(|block| match block {
            Block::Stats { counters, .. } => counters.iter().map(|c| c.key.as_str()).collect(),
            _ => Vec::new(),
        })
    }
}

/// A revealable piece of a slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Text {
        key: String,
        text: String,
    },
    Heading {
        key: String,
        text: String,
    },
    /// Project card; tilts toward the pointer
    Card {
        key: String,
        title: String,
        body: String,
        #[serde(default)]
        tags: Vec<String>,
    },
    /// Row of animated counters
    Stats {
        key: String,
        counters: Vec<CounterSpec>,
    },
    Links {
        key: String,
        links: Vec<Link>,
    },
}

impl Block {
    pub fn key(&self) -> &str {
        match self {
            Block::Text { key, .. }
            | Block::Heading { key, .. }
            | Block::Card { key, .. }
            | Block::Stats { key, .. }
            | Block::Links { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSpec {
    pub key: String,
    pub label: String,

    /// Known up front; otherwise filled in by the stats source
    #[serde(default)]
    pub target: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Link {
    /// Address of a `mailto:` link, offered for copying
    pub fn email(&self) -> Option<&str> {
        self.url
            .strip_prefix("mailto:")
            .map(|rest| rest.split('?').next().unwrap_or(rest))
            .filter(|address| !address.is_empty())
    }
}
