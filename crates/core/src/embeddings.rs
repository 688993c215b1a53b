pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;

pub trait Embedder {
    fn dimensions(&self) -> usize;
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Hashed character-trigram embedding. Deterministic for a given dimension,
/// so re-embedding identical text always yields the identical vector.
#[derive(Debug, Clone, Copy)]
pub struct HashedTrigramEmbedder {
    pub dimensions: usize,
}

impl Default for HashedTrigramEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }
}

impl Embedder for HashedTrigramEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimensions.max(1)];
        let lowered = text.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();

        if chars.is_empty() {
            return vector;
        }

        if chars.len() < 3 {
            // too short for a trigram, hash the whole text instead
            let bucket = (fnv1a(lowered.as_bytes()) % vector.len() as u64) as usize;
            vector[bucket] = 1.0;
            return vector;
        }

        for window in chars.windows(3) {
            let token: String = window.iter().collect();
            let bucket = (fnv1a(token.as_bytes()) % vector.len() as u64) as usize;
            vector[bucket] += 1.0;
        }

        let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        vector
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = 1469598103934665603u64;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(1099511628211);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::{Embedder, HashedTrigramEmbedder};

    #[test]
    fn embedder_is_deterministic() {
        let embedder = HashedTrigramEmbedder::default();
        let first = embedder.embed("transformer attention heads");
        let second = embedder.embed("transformer attention heads");
        assert_eq!(first, second);
    }

    #[test]
    fn embedder_outputs_configured_length() {
        let embedder = HashedTrigramEmbedder { dimensions: 64 };
        assert_eq!(embedder.embed("abc").len(), 64);
        assert_eq!(embedder.dimensions(), 64);
    }

    #[test]
    fn nonempty_text_embeds_to_unit_norm() {
        let embedder = HashedTrigramEmbedder::default();
        let vector = embedder.embed("semantic retrieval over papers");
        let norm: f32 = vector.iter().map(|value| value * value).sum();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn empty_text_embeds_to_zero_vector() {
        let embedder = HashedTrigramEmbedder { dimensions: 16 };
        assert!(embedder.embed("").iter().all(|value| *value == 0.0));
    }

    #[test]
    fn tiny_text_still_lands_in_a_bucket() {
        let embedder = HashedTrigramEmbedder { dimensions: 16 };
        let vector = embedder.embed("ab");
        assert_eq!(vector.iter().filter(|value| **value == 1.0).count(), 1);
    }
}
