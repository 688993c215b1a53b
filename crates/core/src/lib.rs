pub mod catalog;
pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod export;
pub mod extractor;
pub mod ingest;
pub mod models;
pub mod retriever;
pub mod stores;
pub mod traits;

pub use catalog::{normalize_catalog, CATALOG_COLUMNS};
pub use chunking::{split_text, ChunkingConfig};
pub use embeddings::{Embedder, HashedTrigramEmbedder, DEFAULT_EMBEDDING_DIMENSIONS};
pub use error::{IngestError, SearchError};
pub use export::copy_matched_sources;
pub use extractor::{clean_page_text, LopdfExtractor, PageText, PdfExtractor};
pub use ingest::{chunk_document, discover_documents, Ingestor};
pub use models::{
    ChunkRecord, DistanceMetric, IndexingReport, IngestionOptions, RankedResult, SkippedDocument,
    StoreMatch,
};
pub use retriever::Retriever;
pub use stores::ChromaStore;
pub use traits::VectorIndex;
