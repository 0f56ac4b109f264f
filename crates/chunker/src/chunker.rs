use crate::config::ChunkerConfig;
use crate::error::Result;

/// Main chunker interface for splitting document text into windows
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a new chunker, rejecting configurations that would never advance
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split text into overlapping windows.
    ///
    /// Offsets are character offsets, so multi-byte text never splits inside
    /// a code point. Empty text yields no chunks; text shorter than
    /// `chunk_size` yields one chunk equal to the whole text. The final chunk
    /// may be shorter than `chunk_size`.
    #[must_use]
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < total {
            let end = (start + self.config.chunk_size).min(total);
            chunks.push(chars[start..end].iter().collect());
            if end == total {
                // The last window already covers the tail; a further window
                // would repeat text the previous chunk fully contains.
                break;
            }
            start += self.config.step();
        }

        log::debug!(
            "Split {} chars into {} chunks (size {}, overlap {})",
            total,
            chunks.len(),
            self.config.chunk_size,
            self.config.chunk_overlap
        );

        chunks
    }
}
