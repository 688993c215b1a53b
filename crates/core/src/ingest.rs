use crate::chunking::{split_text, ChunkingConfig};
use crate::error::IngestError;
use crate::extractor::{clean_page_text, PdfExtractor};
use crate::models::{ChunkRecord, IndexingReport, IngestionOptions, SkippedDocument};
use crate::traits::VectorIndex;
use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

pub fn discover_documents(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if entry.file_type().is_file() && has_pdf_extension(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Extracts, cleans and windows one document into records ready for the
/// store. Pages that clean down to nothing contribute no chunks.
pub fn chunk_document(
    extractor: &dyn PdfExtractor,
    path: &Path,
    config: ChunkingConfig,
) -> Result<Vec<ChunkRecord>, IngestError> {
    let source = source_name(path)?;
    let absolute = path.canonicalize()?;
    let pages = extractor.extract_pages(path)?;

    let mut chunks = Vec::new();
    for page in pages {
        let cleaned = clean_page_text(&page.text);
        if cleaned.is_empty() {
            continue;
        }

        for text in split_text(&cleaned, config) {
            chunks.push(ChunkRecord {
                chunk_id: Uuid::new_v4().to_string(),
                text,
                source: source.clone(),
                page: page.number,
                path: absolute.to_string_lossy().to_string(),
            });
        }
    }

    Ok(chunks)
}

fn source_name(path: &Path) -> Result<String, IngestError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToString::to_string)
        .ok_or_else(|| {
            IngestError::MissingFileName(format!("path missing filename: {}", path.display()))
        })
}

pub struct Ingestor<S, X> {
    store: S,
    extractor: X,
    config: ChunkingConfig,
}

impl<S, X> Ingestor<S, X>
where
    S: VectorIndex + Send + Sync,
    X: PdfExtractor + Send + Sync,
{
    pub fn new(store: S, extractor: X, options: IngestionOptions) -> Result<Self, IngestError> {
        let config = ChunkingConfig::try_from(options)?;

        Ok(Self {
            store,
            extractor,
            config,
        })
    }

    /// Walks the folder, chunks every readable PDF and writes the whole
    /// batch to the store in one upsert. A document that fails to parse is
    /// reported as skipped instead of aborting the run.
    pub async fn ingest(&self, folder: &Path) -> Result<IndexingReport, IngestError> {
        if !folder.is_dir() {
            return Err(IngestError::MissingInput(format!(
                "document folder {} does not exist; create it and drop PDFs inside before ingesting",
                folder.display()
            )));
        }

        let files = discover_documents(folder);
        if files.is_empty() {
            return Err(IngestError::MissingInput(format!(
                "no pdf files found in {}; add PDFs and rerun",
                folder.display()
            )));
        }

        let mut chunks = Vec::new();
        let mut skipped = Vec::new();
        let mut document_count = 0usize;

        for path in files {
            match chunk_document(&self.extractor, &path, self.config) {
                Ok(file_chunks) => {
                    document_count += 1;
                    chunks.extend(file_chunks);
                }
                Err(error) => skipped.push(SkippedDocument {
                    path,
                    reason: error.to_string(),
                }),
            }
        }

        if chunks.is_empty() {
            return Err(IngestError::NoContentExtracted);
        }

        let chunk_count = chunks.len();
        self.store.upsert_chunks(&chunks).await?;

        Ok(IndexingReport {
            chunk_count,
            document_count,
            skipped,
            completed_at: Utc::now(),
        })
    }
}
