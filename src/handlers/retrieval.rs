use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::prompts::StringPromptTemplate;
use crate::traits::{Handler, LanguageModel, Retriever, Runnable};
use crate::Result;

const QA_PROMPT: &str = "Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.

{context}

Question: {question}
Helpful Answer:";

/// Answers questions about retrieved documents, citing a few source snippets
pub struct RetrievalQaHandler<R: Retriever, L: LanguageModel> {
    retriever: R,
    llm: Arc<L>,
    template: StringPromptTemplate,
    max_sources: usize,
    snippet_chars: usize,
}

impl<R: Retriever, L: LanguageModel> RetrievalQaHandler<R, L> {
    pub fn new(retriever: R, llm: Arc<L>) -> Self {
        Self {
            retriever,
            llm,
            template: StringPromptTemplate::from_template(QA_PROMPT),
            max_sources: 2,
            snippet_chars: 300,
        }
    }

    /// How many source snippets to append to the answer
    pub fn with_max_sources(mut self, max_sources: usize) -> Self {
        self.max_sources = max_sources;
        self
    }

    /// How many characters of each source to show
    pub fn with_snippet_chars(mut self, snippet_chars: usize) -> Self {
        self.snippet_chars = snippet_chars;
        self
    }
}

#[async_trait]
impl<R, L> Handler for RetrievalQaHandler<R, L>
where
    R: Retriever + 'static,
    L: LanguageModel + 'static,
{
    async fn handle(&self, query: &str) -> Result<String> {
        let documents = self.retriever.retrieve(query).await?;
        debug!(documents = documents.len(), "retrieved context");

        let context = documents
            .iter()
            .map(|doc| doc.page_content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = self
            .template
            .format_pairs(&[("context", context.as_str()), ("question", query)])?;
        let answer = self.llm.invoke(prompt).await?;

        if documents.is_empty() || self.max_sources == 0 {
            return Ok(answer);
        }

        let sources = documents
            .iter()
            .take(self.max_sources)
            .map(|doc| doc.snippet(self.snippet_chars))
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(format!("{}\n\n📄 Source Snippets:\n{}", answer, sources))
    }
}
