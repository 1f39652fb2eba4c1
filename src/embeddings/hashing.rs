use async_trait::async_trait;

use crate::traits::{EmbeddingModel, Runnable};
use crate::Result;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME))
}

/// A local bag-of-words embedding: each lowercased word is hashed into one of
/// `dimension` buckets and the counts are scaled to unit length.
///
/// Needs no network or model weights, and is stable across runs, so an index
/// built from it always retrieves the same chunks for the same question.
#[derive(Debug, Clone)]
pub struct HashingEmbeddings {
    dimension: usize,
}

impl Default for HashingEmbeddings {
    fn default() -> Self {
        Self { dimension: 256 }
    }
}

impl HashingEmbeddings {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];

        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = fnv1a(word.to_lowercase().as_bytes()) % self.dimension as u64;
            vector[bucket as usize] += 1.0;
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }
        vector
    }
}

#[async_trait]
impl Runnable<String, Vec<f32>> for HashingEmbeddings {
    async fn invoke(&self, input: String) -> Result<Vec<f32>> {
        Ok(self.embed(&input))
    }
}

impl EmbeddingModel for HashingEmbeddings {
    fn model_name(&self) -> &str {
        "hashing-bag-of-words"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_case_and_punctuation_do_not_matter() {
        let embeddings = HashingEmbeddings::default();
        let a = embeddings.invoke("Who directed Avatar?".to_string()).await.unwrap();
        let b = embeddings.invoke("who DIRECTED avatar".to_string()).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 256);
    }

    #[tokio::test]
    async fn test_unit_length() {
        let embeddings = HashingEmbeddings::new(32);
        let v = embeddings.invoke("box office collection".to_string()).await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let embeddings = HashingEmbeddings::new(8);
        let v = embeddings.invoke("  ...  ".to_string()).await.unwrap();
        assert_eq!(v, vec![0.0; 8]);
    }

    #[tokio::test]
    async fn test_embed_batch_keeps_order() {
        let embeddings = HashingEmbeddings::new(16);
        let batch = embeddings
            .embed_batch(vec!["plot".to_string(), "cast".to_string()])
            .await
            .unwrap();
        assert_eq!(batch[0], embeddings.embed("plot"));
        assert_eq!(batch[1], embeddings.embed("cast"));
    }
}
