use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for text chunking behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Window size in characters
    pub chunk_size: usize,

    /// Overlap with the previous window in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkerError::invalid_config("chunk_size must be positive"));
        }
        if self.chunk_overlap >= self.chunk_size {
            // A step of zero (or less) would never advance the window.
            return Err(ChunkerError::invalid_config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Window advance per chunk in characters
    #[must_use]
    pub const fn step(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}
