//! Fixed-size overlapping text chunking

use crate::error::{Error, Result};

/// Splits text into fixed-size overlapping character windows.
///
/// Every chunk after the first starts exactly `overlap` characters before
/// the previous chunk ends, so consecutive chunks share an `overlap`-sized
/// region and the non-overlapping spans concatenate back to the input. The
/// final chunk is whatever remains and may be shorter than `chunk_size`.
///
/// Windows are measured in `char`s, not bytes, so multi-byte text never
/// splits inside a code point.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker. `overlap` must be smaller than `chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive".to_string()));
        }
        if overlap >= chunk_size {
            return Err(Error::Config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    /// Split `text` into chunks. Empty input yields no chunks; input shorter
    /// than the chunk size yields exactly one chunk equal to the input.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}
