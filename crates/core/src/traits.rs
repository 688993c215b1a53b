use crate::error::SearchError;
use crate::models::{ChunkRecord, DistanceMetric, StoreMatch};
use async_trait::async_trait;

/// The vector store collaborator. Implementations own their embedding
/// function, so callers hand over chunk text and question text and the
/// store produces and compares vectors internally.
#[async_trait]
pub trait VectorIndex {
    /// Distance semantics the store was created with; score normalization
    /// is keyed off this rather than assumed by callers.
    fn distance_metric(&self) -> DistanceMetric;

    async fn upsert_chunks(&self, chunks: &[ChunkRecord]) -> Result<(), SearchError>;

    async fn search(&self, question: &str, top_k: usize)
        -> Result<Vec<StoreMatch>, SearchError>;
}
