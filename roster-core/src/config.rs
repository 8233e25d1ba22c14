//! Roster configuration.

use std::path::PathBuf;

/// Configuration for opening a roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterConfig {
    /// Directory holding the reference tables. `None` uses the bundled set.
    pub data_dir: Option<PathBuf>,

    /// Directory for character files and the index. `None` keeps the
    /// roster in memory only.
    pub save_dir: Option<PathBuf>,

    /// Fixed dice seed. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl RosterConfig {
    /// An in-memory roster with bundled tables and clock-seeded dice.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read reference tables from a directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Persist characters to a directory.
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(dir.into());
        self
    }

    /// Seed the dice for a reproducible session.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
