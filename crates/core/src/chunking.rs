use crate::error::IngestError;
use crate::models::IngestionOptions;

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    chunk_chars: usize,
    overlap_chars: usize,
}

impl ChunkingConfig {
    pub fn new(chunk_chars: usize, overlap_chars: usize) -> Result<Self, IngestError> {
        if chunk_chars <= overlap_chars {
            return Err(IngestError::InvalidChunkConfig(format!(
                "chunk_chars ({chunk_chars}) must be greater than overlap_chars ({overlap_chars})"
            )));
        }

        Ok(Self {
            chunk_chars,
            overlap_chars,
        })
    }
}

impl TryFrom<IngestionOptions> for ChunkingConfig {
    type Error = IngestError;

    fn try_from(value: IngestionOptions) -> Result<Self, Self::Error> {
        Self::new(value.chunk_chars, value.overlap_chars)
    }
}

pub fn split_text(text: &str, config: ChunkingConfig) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + config.chunk_chars).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            // the window that reached the end is the final chunk
            break;
        }
        start = end.saturating_sub(config.overlap_chars);
    }

    chunks
}
