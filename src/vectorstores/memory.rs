use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::error::Error;
use crate::schema::Document;
use crate::traits::{EmbeddingModel, Retriever, Runnable};
use crate::Result;

use super::cosine_similarity;

/// How many chunks a retrieval returns unless configured otherwise
pub const DEFAULT_TOP_K: usize = 4;

#[derive(Debug, Clone)]
struct IndexedChunk {
    document: Document,
    embedding: Vec<f32>,
}

/// An in-memory index of embedded document chunks, searched by cosine similarity.
///
/// Chunks can be added through a shared reference, so one store can serve as
/// a [`Retriever`] while more documents are indexed.
pub struct MemoryVectorStore {
    chunks: RwLock<Vec<IndexedChunk>>,
    embeddings: Arc<dyn EmbeddingModel>,
    top_k: usize,
}

impl MemoryVectorStore {
    pub fn new(embeddings: impl EmbeddingModel + 'static) -> Self {
        Self {
            chunks: RwLock::new(Vec::new()),
            embeddings: Arc::new(embeddings),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Build a store already holding `documents`
    pub async fn from_documents(
        embeddings: impl EmbeddingModel + 'static,
        documents: Vec<Document>,
    ) -> Result<Self> {
        let store = Self::new(embeddings);
        store.add_documents(documents).await?;
        Ok(store)
    }

    /// How many documents [`Retriever::retrieve`] returns
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Embed and index documents; returns how many were added
    pub async fn add_documents(&self, documents: Vec<Document>) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let texts = documents.iter().map(|d| d.page_content.clone()).collect();
        let embeddings = self.embeddings.embed_batch(texts).await?;
        if embeddings.len() != documents.len() {
            return Err(Error::Retrieval(format!(
                "Embedding model returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }

        let added = documents.len();
        let mut chunks = self
            .chunks
            .write()
            .map_err(|_| Error::Retrieval("Vector store lock poisoned".to_string()))?;
        chunks.extend(
            documents
                .into_iter()
                .zip(embeddings)
                .map(|(document, embedding)| IndexedChunk {
                    document,
                    embedding,
                }),
        );
        debug!(added, total = chunks.len(), "indexed documents");
        Ok(added)
    }

    /// The `limit` most similar documents with their similarity, best first
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<(Document, f32)>> {
        let query_embedding = self.embeddings.invoke(query.to_string()).await?;

        let chunks = self
            .chunks
            .read()
            .map_err(|_| Error::Retrieval("Vector store lock poisoned".to_string()))?;

        let mut scored: Vec<(Document, f32)> = chunks
            .iter()
            .map(|chunk| {
                (
                    chunk.document.clone(),
                    cosine_similarity(&query_embedding, &chunk.embedding),
                )
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    pub fn len(&self) -> Result<usize> {
        self.chunks
            .read()
            .map(|chunks| chunks.len())
            .map_err(|_| Error::Retrieval("Vector store lock poisoned".to_string()))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl Retriever for MemoryVectorStore {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        let results = self.search(query, self.top_k).await?;
        Ok(results.into_iter().map(|(document, _)| document).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashingEmbeddings;

    fn festival_docs() -> Vec<Document> {
        vec![
            Document::new("Avatar was directed by James Cameron.").with_metadata("page", 1),
            Document::new("Sponsors receive logo placement on the banner.").with_metadata("page", 2),
            Document::new("The festival runs for three days in March.").with_metadata("page", 3),
        ]
    }

    #[tokio::test]
    async fn test_search_ranks_most_similar_first() {
        let store = MemoryVectorStore::from_documents(HashingEmbeddings::default(), festival_docs())
            .await
            .unwrap();
        assert_eq!(store.len().unwrap(), 3);

        let results = store.search("Who directed Avatar?", 3).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0.page_content, "Avatar was directed by James Cameron.");
        assert!(results[0].1 > results[1].1);
    }

    #[tokio::test]
    async fn test_retrieve_respects_top_k() {
        let store = MemoryVectorStore::new(HashingEmbeddings::default()).with_top_k(1);
        assert_eq!(store.add_documents(festival_docs()).await.unwrap(), 3);

        let docs = store.retrieve("What do sponsors receive?").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].metadata.get("page"), Some(&serde_json::json!(2)));
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryVectorStore::new(HashingEmbeddings::default());
        assert!(store.is_empty().unwrap());
        assert_eq!(store.add_documents(Vec::new()).await.unwrap(), 0);
        assert!(store.retrieve("anything").await.unwrap().is_empty());
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
