//! Statistics collaborator seam
//!
//! Counter targets come from somewhere outside the deck (repository counts,
//! solved problems, ...). The deck only announces when it wants them; the host
//! asks a [`StatsSource`] and hands the numbers back.

use serde::{Deserialize, Serialize};

/// Target value for one counter element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterTarget {
    /// Counter element key
    pub key: String,

    pub value: u64,
}

impl CounterTarget {
    pub fn new(key: impl Into<String>, value: u64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Trait for providers of counter targets
#[async_trait::async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch the current targets
    async fn counter_targets(&self) -> anyhow::Result<Vec<CounterTarget>>;

    /// Get the source name
    fn source_name(&self) -> &str;
}
