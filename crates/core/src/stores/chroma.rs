use crate::embeddings::Embedder;
use crate::error::SearchError;
use crate::models::{ChunkRecord, DistanceMetric, StoreMatch};
use crate::traits::VectorIndex;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::HashSet;
use url::Url;

/// Client for a Chroma server. The store owns its embedding function, so
/// a collection written by one embedder must be queried with the same one.
pub struct ChromaStore<E> {
    endpoint: String,
    collection: String,
    client: Client,
    embedder: E,
    metric: DistanceMetric,
}

impl<E: Embedder> ChromaStore<E> {
    pub fn connect(
        endpoint: &str,
        collection: impl Into<String>,
        embedder: E,
    ) -> Result<Self, SearchError> {
        let parsed = Url::parse(endpoint)?;

        Ok(Self {
            endpoint: parsed.as_str().trim_end_matches('/').to_string(),
            collection: collection.into(),
            client: Client::new(),
            embedder,
            metric: DistanceMetric::Cosine,
        })
    }

    /// Creates the collection if needed and returns its id. Chroma addresses
    /// data operations by collection id, not name.
    async fn create_or_get_collection(&self) -> Result<String, SearchError> {
        let response = self
            .client
            .post(format!("{}/api/v1/collections", self.endpoint))
            .json(&json!({
                "name": self.collection,
                "metadata": { "hnsw:space": self.metric.space_name() },
                "get_or_create": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::BackendResponse {
                backend: "chroma".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        collection_id_from(&parsed)
    }

    /// Looks the collection up by name without creating it. Query-side
    /// callers hit this before an index exists.
    async fn existing_collection(&self) -> Result<String, SearchError> {
        let response = self
            .client
            .get(format!(
                "{}/api/v1/collections/{}",
                self.endpoint, self.collection
            ))
            .send()
            .await?;

        if response.status().is_client_error() {
            return Err(SearchError::NotReady(format!(
                "collection '{}' does not exist yet; run `paperdex ingest` first",
                self.collection
            )));
        }

        if !response.status().is_success() {
            return Err(SearchError::BackendResponse {
                backend: "chroma".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        collection_id_from(&parsed)
    }
}

#[async_trait]
impl<E> VectorIndex for ChromaStore<E>
where
    E: Embedder + Send + Sync,
{
    fn distance_metric(&self) -> DistanceMetric {
        self.metric
    }

    async fn upsert_chunks(&self, chunks: &[ChunkRecord]) -> Result<(), SearchError> {
        if chunks.is_empty() {
            return Ok(());
        }

        let mut seen = HashSet::new();
        for chunk in chunks {
            if !seen.insert(chunk.chunk_id.as_str()) {
                return Err(SearchError::Request(format!(
                    "duplicate chunk id {} in upsert batch",
                    chunk.chunk_id
                )));
            }
        }

        let ids: Vec<&str> = chunks.iter().map(|chunk| chunk.chunk_id.as_str()).collect();
        let documents: Vec<&str> = chunks.iter().map(|chunk| chunk.text.as_str()).collect();
        let embeddings: Vec<Vec<f32>> = chunks
            .iter()
            .map(|chunk| self.embedder.embed(&chunk.text))
            .collect();
        let metadatas: Vec<Value> = chunks
            .iter()
            .map(|chunk| {
                json!({
                    "source": chunk.source,
                    "page": chunk.page,
                    "path": chunk.path,
                })
            })
            .collect();

        let collection_id = self.create_or_get_collection().await?;

        let response = self
            .client
            .post(format!(
                "{}/api/v1/collections/{}/upsert",
                self.endpoint, collection_id
            ))
            .json(&json!({
                "ids": ids,
                "embeddings": embeddings,
                "documents": documents,
                "metadatas": metadatas,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::BackendResponse {
                backend: "chroma".to_string(),
                details: response.status().to_string(),
            });
        }

        Ok(())
    }

    async fn search(&self, question: &str, top_k: usize) -> Result<Vec<StoreMatch>, SearchError> {
        let query_vector = self.embedder.embed(question);
        let collection_id = self.existing_collection().await?;

        let response = self
            .client
            .post(format!(
                "{}/api/v1/collections/{}/query",
                self.endpoint, collection_id
            ))
            .json(&json!({
                "query_embeddings": [query_vector],
                "n_results": top_k,
                "include": ["metadatas", "distances"],
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::BackendResponse {
                backend: "chroma".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        Ok(parse_query_matches(&parsed))
    }
}

fn collection_id_from(payload: &Value) -> Result<String, SearchError> {
    payload
        .pointer("/id")
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| SearchError::BackendResponse {
            backend: "chroma".to_string(),
            details: "collection response carries no id".to_string(),
        })
}

/// Chroma nests query results one level per submitted query vector; we
/// always submit exactly one, so everything lives at index zero.
fn parse_query_matches(payload: &Value) -> Vec<StoreMatch> {
    let distances = payload
        .pointer("/distances/0")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let metadatas = payload
        .pointer("/metadatas/0")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut matches = Vec::new();
    for (distance, metadata) in distances.iter().zip(metadatas.iter()) {
        let distance = distance.as_f64().unwrap_or(0.0);
        let source = metadata
            .pointer("/source")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let page = metadata
            .pointer("/page")
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32;
        let path = metadata
            .pointer("/path")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        matches.push(StoreMatch {
            distance,
            source,
            page,
            path,
        });
    }

    matches
}
