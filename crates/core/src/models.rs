use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub chunk_id: String,
    pub text: String,
    pub source: String,
    pub page: u32,
    pub path: String,
}

#[derive(Debug, Clone, Copy)]
pub struct IngestionOptions {
    pub chunk_chars: usize,
    pub overlap_chars: usize,
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            chunk_chars: 1_000,
            overlap_chars: 200,
        }
    }
}

pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

pub struct IndexingReport {
    pub chunk_count: usize,
    pub document_count: usize,
    pub skipped: Vec<SkippedDocument>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMatch {
    pub distance: f64,
    pub source: String,
    pub page: u32,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub score: f64,
    pub source: String,
    pub page: u32,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    Cosine,
}

impl DistanceMetric {
    /// Store-native distance to a similarity in the conceptual [0, 1] range.
    /// `1 - distance` holds only for collections created with cosine space.
    pub fn similarity(&self, distance: f64) -> f64 {
        match self {
            DistanceMetric::Cosine => 1.0 - distance,
        }
    }

    pub fn space_name(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
        }
    }
}
