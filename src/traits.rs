use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::schema::{Document, Message};
use crate::Result;

/// Trait for any component that can be invoked with an input and produces an output asynchronously.
///
/// Language models, chat models and prompt templates all share this shape.
#[async_trait]
pub trait Runnable<Input: Send + 'static, Output: 'static> {
    /// Run the component on the given input and return the output.
    async fn invoke(&self, input: Input) -> Result<Output>;

    /// Run the component on a batch of inputs.
    async fn batch(&self, inputs: Vec<Input>) -> Result<Vec<Result<Output>>>
    where
        Self: Sized,
        Input: Sync,
        Output: Send,
    {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            results.push(self.invoke(input).await);
        }
        Ok(results)
    }
}

/// Trait for language models that can generate text from a string prompt.
#[async_trait]
pub trait LanguageModel: Runnable<String, String> + Send + Sync {
    /// Get the model name/identifier.
    fn model_name(&self) -> &str;
    /// Get model parameters as a key-value map.
    fn parameters(&self) -> HashMap<String, Value>;
}

/// Trait for chat models that can handle message exchanges (multi-turn).
#[async_trait]
pub trait ChatModel: Runnable<Vec<Message>, Message> + Send + Sync {
    /// Get the model name/identifier.
    fn model_name(&self) -> &str;
    /// Get model parameters as a key-value map.
    fn parameters(&self) -> HashMap<String, Value>;
}

/// The capability a router dispatches to: accept a query, return a response.
///
/// Handlers may perform network or file I/O and may fail; the router never
/// masks those failures.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use marquee::traits::Handler;
/// use marquee::Result;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Handler for Echo {
///     async fn handle(&self, query: &str) -> Result<String> {
///         Ok(query.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync {
    /// Produce a response for the given query
    async fn handle(&self, query: &str) -> Result<String>;
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn handle(&self, query: &str) -> Result<String> {
        (**self).handle(query).await
    }
}

/// Trait for sources of documents relevant to a query (vector stores, search APIs, etc.).
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return the documents most relevant to the query, best first.
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>>;
}

/// Trait for sources that produce documents (files, web pages, ...)
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<Document>>;
}

/// Trait for splitting text into chunks small enough to embed and cite.
pub trait TextSplitter {
    /// Split text into chunks.
    fn split_text(&self, text: &str) -> Result<Vec<String>>;

    /// Split each document into chunks that keep the document's metadata.
    fn split_documents(&self, documents: Vec<Document>) -> Result<Vec<Document>> {
        let mut chunks = Vec::new();
        for doc in documents {
            for text in self.split_text(&doc.page_content)? {
                chunks.push(Document {
                    page_content: text,
                    metadata: doc.metadata.clone(),
                });
            }
        }
        Ok(chunks)
    }
}

/// Trait for embedding models (text to vector).
#[async_trait]
pub trait EmbeddingModel: Runnable<String, Vec<f32>> + Send + Sync {
    /// Get the model name/identifier.
    fn model_name(&self) -> &str;
    /// Length of the vectors this model produces.
    fn dimension(&self) -> usize;
    /// Embed several texts, one `invoke` per text unless the model batches natively.
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.invoke(text).await?);
        }
        Ok(embeddings)
    }
}
