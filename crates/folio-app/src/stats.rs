//! Counter target providers

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use folio_core::{CounterTarget, StatsSource};
use tracing::info;

use crate::portfolio::StatsSettings;

/// Targets fixed in the manifest
pub struct StaticStats {
    targets: Vec<CounterTarget>,
}

impl StaticStats {
    pub fn new(targets: Vec<CounterTarget>) -> Self {
        Self { targets }
    }
}

#[async_trait]
impl StatsSource for StaticStats {
    async fn counter_targets(&self) -> Result<Vec<CounterTarget>> {
        Ok(self.targets.clone())
    }

    fn source_name(&self) -> &str {
        "manifest"
    }
}

/// Targets read from a JSON file of `{ "key": value }` pairs
pub struct FileStats {
    path: PathBuf,
    name: String,
}

impl FileStats {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl StatsSource for FileStats {
    async fn counter_targets(&self) -> Result<Vec<CounterTarget>> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read stats file {}", self.path.display()))?;

        let values: std::collections::BTreeMap<String, u64> =
            serde_json::from_str(&text).with_context(|| format!("Invalid stats file {}", self.path.display()))?;

        info!(source = %self.name, counters = values.len(), "counter targets loaded");
        Ok(values.into_iter().map(|(key, value)| CounterTarget::new(key, value)).collect())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

/// Pick the provider the manifest asks for
pub fn source_for(settings: &StatsSettings) -> Box<dyn StatsSource> {
    match &settings.file {
        Some(path) => Box::new(FileStats::new(path.clone())),
        None => Box::new(StaticStats::new(settings.targets.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_static_stats() {
        let source = StaticStats::new(vec![CounterTarget::new("repos", 3)]);
        assert_eq!(source.counter_targets().await.unwrap(), vec![CounterTarget::new("repos", 3)]);
        assert_eq!(source.source_name(), "manifest");
    }

    #[tokio::test]
    async fn test_file_stats_reads_pairs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "stars": 118, "repos": 32 }}"#).unwrap();

        let source = FileStats::new(file.path());
        let targets = source.counter_targets().await.unwrap();
        assert_eq!(
            targets,
            vec![CounterTarget::new("repos", 32), CounterTarget::new("stars", 118)]
        );
    }

    #[tokio::test]
    async fn test_file_stats_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileStats::new(dir.path().join("missing.json")).counter_targets().await.is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(FileStats::new(file.path()).counter_targets().await.is_err());
    }

    #[tokio::test]
    async fn test_source_for_settings() {
        let settings = StatsSettings {
            file: None,
            targets: vec![CounterTarget::new("a", 1)],
        };
        let source = source_for(&settings);
        assert_eq!(source.source_name(), "manifest");
        assert_eq!(source.counter_targets().await.unwrap().len(), 1);
    }
}
