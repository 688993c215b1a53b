use crate::error::SearchError;
use crate::models::RankedResult;
use crate::traits::VectorIndex;

pub struct Retriever<S> {
    store: S,
}

impl<S> Retriever<S>
where
    S: VectorIndex + Send + Sync,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Asks the store for the nearest chunks and turns raw distances into
    /// similarity scores, best first. Ties keep the store's answer order.
    pub async fn retrieve(
        &self,
        question: &str,
        top_k: usize,
        min_score: Option<f64>,
    ) -> Result<Vec<RankedResult>, SearchError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        if top_k == 0 {
            return Err(SearchError::Request(
                "top_k must be at least 1".to_string(),
            ));
        }

        let metric = self.store.distance_metric();
        let matches = self.store.search(question, top_k).await?;

        let mut ranked: Vec<RankedResult> = matches
            .into_iter()
            .map(|hit| RankedResult {
                score: metric.similarity(hit.distance),
                source: hit.source,
                page: hit.page,
                path: hit.path,
            })
            .collect();

        ranked.sort_by(|left, right| right.score.total_cmp(&left.score));

        if let Some(min_score) = min_score {
            ranked.retain(|result| result.score >= min_score);
        }

        Ok(ranked)
    }
}
