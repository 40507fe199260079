//! Configuration for rolling tables from a directory.

use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::resolve::DEFAULT_MAX_DEPTH;
use crate::source::{DEFAULT_EXTENSION, DirectorySource};

/// Configuration for a roll.
#[derive(Debug, Clone)]
pub struct RollerConfig {
    /// Directory searched for tables.
    pub root: PathBuf,
    /// RNG seed for reproducible rolls; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// How deeply table references may nest.
    pub max_depth: usize,
    /// Table file extension, without the dot.
    pub extension: String,
}

impl Default for RollerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            seed: None,
            max_depth: DEFAULT_MAX_DEPTH,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl RollerConfig {
    /// Set the table directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Set the reference nesting limit (at least 1).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Set the table file extension. A leading dot is ignored.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// The table source described by this configuration.
    pub fn source(&self) -> DirectorySource {
        DirectorySource::new(&self.root).with_extension(&self.extension)
    }

    /// A fresh RNG, seeded from `seed` or from the OS.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
