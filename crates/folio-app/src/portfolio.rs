//! Portfolio manifest
//!
//! A single JSON file describing the slides, the deck settings and where the
//! counter numbers come from. Without a file the built-in portfolio is used.

use std::path::{Path, PathBuf};

use ahash::AHashSet;
use folio_core::{ConfigError, CounterTarget, DeckConfig, ThemeMode};
use folio_ui::{Block, CounterSpec, Link, SlideContent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid manifest: {0}")]
    Invalid(String),
}

/// Where counter targets come from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSettings {
    /// JSON file with the targets, read when the stats slide is first shown
    pub file: Option<PathBuf>,

    /// Fixed targets used when no file is given
    pub targets: Vec<CounterTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub title: String,

    /// Saved theme choice; the system preference applies when absent
    #[serde(default)]
    pub theme: Option<ThemeMode>,

    #[serde(default)]
    pub deck: DeckConfig,

    #[serde(default)]
    pub stats: StatsSettings,

    pub slides: Vec<SlideContent>,
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut manifest = Self::from_json(&text)?;

        // Relative stats files resolve against the manifest's directory
        if let (Some(file), Some(dir)) = (manifest.stats.file.as_mut(), path.parent()) {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }
        Ok(manifest)
    }

    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_json::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        self.deck.validate()?;

        let mut ids = AHashSet::default();
        for slide in &self.slides {
            if !ids.insert(slide.id.as_str()) {
                return Err(ManifestError::Invalid(format!("duplicate slide id '{}'", slide.id)));
            }

            let mut keys = AHashSet::default();
            for block in &slide.blocks {
                if !keys.insert(block.key()) {
                    return Err(ManifestError::Invalid(format!(
                        "duplicate block key '{}' in slide '{}'",
                        block.key(),
                        slide.id
                    )));
                }
            }
        }

        if let Some(stats_slide) = &self.deck.stats_slide {
            if !ids.contains(stats_slide.as_str()) {
                return Err(ManifestError::Invalid(format!(
                    "stats slide '{}' is not in the deck",
                    stats_slide
                )));
            }
        }

        Ok(())
    }

    /// The portfolio shipped with the binary
    pub fn builtin() -> Self {
        let deck = DeckConfig {
            stats_slide: Some("stats".to_string()),
            ..DeckConfig::default()
        };

        let home = SlideContent {
            nav_label: Some("Home".into()),
            subtitle: Some("Systems programmer. Scroll or swipe to move through the deck.".into()),
            hero: true,
            ..SlideContent::new("home", "Hi, I build things.")
        }
        .with_block(text("pitch", "I like small tools, fast feedback and code that stays readable."));

        let about = SlideContent {
            nav_label: Some("About".into()),
            ..SlideContent::new("about", "About")
        }
        .with_block(text(
            "story",
            "Started with shell scripts, stayed for compilers. These days mostly Rust, \
             some Python, and whatever the problem calls for.",
        ))
        .with_block(Block::Heading {
            key: "focus-title".into(),
            text: "Focus".into(),
        })
        .with_block(text("focus", "Developer tooling, parsers, data pipelines."));

        let projects = SlideContent {
            nav_label: Some("Projects".into()),
            ..SlideContent::new("projects", "Projects")
        }
        .with_block(card("deck", "Card deck", "This portfolio as a native app.", &["rust", "egui"]))
        .with_block(card("lexer", "Lexer kit", "Table-driven lexer generator.", &["rust", "parsing"]))
        .with_block(card("sync", "File sync", "Content-addressed directory sync.", &["tokio", "networking"]))
        .with_block(card("plots", "Plot server", "Streams sensor data to the browser.", &["websockets"]));

        let stats = SlideContent {
            nav_label: Some("Stats".into()),
            ..SlideContent::new("stats", "By the numbers")
        }
        .with_block(text("stats-intro", "Counted once, the first time you get here."))
        .with_block(Block::Stats {
            key: "counters".into(),
            counters: vec![
                counter("repos", "Repositories", None),
                counter("stars", "Stars", None),
                counter("solved", "Problems solved", Some(140)),
            ],
        });

        let contact = SlideContent {
            nav_label: Some("Contact".into()),
            scrollable: false,
            ..SlideContent::new("contact", "Say hello")
        }
        .with_block(Block::Links {
            key: "links".into(),
            links: vec![
                Link {
                    label: "Email".into(),
                    url: "mailto:hello@example.com".into(),
                },
                Link {
                    label: "Source".into(),
                    url: "https://example.com/code".into(),
                },
            ],
        });

        Self {
            title: "Portfolio".to_string(),
            theme: None,
            deck,
            stats: StatsSettings {
                file: None,
                targets: vec![CounterTarget::new("repos", 32), CounterTarget::new("stars", 118)],
            },
            slides: vec![home, about, projects, stats, contact],
        }
    }
}

fn text(key: &str, text: &str) -> Block {
    Block::Text {
        key: key.into(),
        text: text.into(),
    }
}

fn card(key: &str, title: &str, body: &str, tags: &[&str]) -> Block {
    Block::Card {
        key: key.into(),
        title: title.into(),
        body: body.into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn counter(key: &str, label: &str, target: Option<u64>) -> CounterSpec {
    CounterSpec {
        key: key.into(),
        label: label.into(),
        target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_is_valid() {
        let manifest = Manifest::builtin();
        assert!(manifest.validate().is_ok());
        assert_eq!(manifest.slides.len(), 5);
        assert_eq!(manifest.deck.stats_slide.as_deref(), Some("stats"));
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let manifest = Manifest::from_json(
            r#"{ "title": "Mine", "slides": [ { "id": "a", "title": "A" }, { "id": "b", "title": "B" } ] }"#,
        )
        .unwrap();
        assert_eq!(manifest.deck, DeckConfig::default());
        assert_eq!(manifest.theme, None);
        assert!(manifest.stats.targets.is_empty());
    }

    #[test]
    fn test_duplicate_slide_ids_rejected() {
        let result = Manifest::from_json(
            r#"{ "title": "x", "slides": [ { "id": "a", "title": "A" }, { "id": "a", "title": "B" } ] }"#,
        );
        assert!(matches!(result, Err(ManifestError::Invalid(_))));
    }

    #[test]
    fn test_unknown_stats_slide_rejected() {
        let result = Manifest::from_json(
            r#"{ "title": "x", "deck": { "stats_slide": "nope" }, "slides": [ { "id": "a", "title": "A" } ] }"#,
        );
        assert!(matches!(result, Err(ManifestError::Invalid(_))));
    }

    #[test]
    fn test_bad_deck_config_surfaces() {
        let result = Manifest::from_json(
            r#"{ "title": "x", "deck": { "reveal": { "counter_tick_ms": 0 } }, "slides": [] }"#,
        );
        assert!(matches!(result, Err(ManifestError::Config(_))));
    }

    #[test]
    fn test_load_resolves_stats_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{ "title": "x", "stats": {{ "file": "numbers.json" }}, "slides": [ {{ "id": "a", "title": "A" }} ] }}"#
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.stats.file, Some(dir.path().join("numbers.json")));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Manifest::load(dir.path().join("absent.json")),
            Err(ManifestError::Io(_))
        ));
    }
}
