use async_trait::async_trait;
use std::sync::Arc;

use crate::prompts::StringPromptTemplate;
use crate::traits::{Handler, LanguageModel, Runnable};
use crate::Result;

const BOX_OFFICE_PROMPT: &str = "Search online and summarize the latest box office forecast for: {query}. Include trends and expected earnings.";

const MOVIE_INFO_PROMPT: &str = "Search online and summarize key facts, plot, or cast details about: {query}. Include recent updates if available.";

/// Fills a prompt template with the query and asks a language model
pub struct PromptHandler<L: LanguageModel> {
    llm: Arc<L>,
    template: StringPromptTemplate,
}

impl<L: LanguageModel> PromptHandler<L> {
    /// Create a handler from a template containing a `{query}` placeholder
    pub fn new(llm: Arc<L>, template: StringPromptTemplate) -> Self {
        Self { llm, template }
    }

    /// Box office forecasts and earnings
    pub fn box_office(llm: Arc<L>) -> Self {
        Self::new(llm, StringPromptTemplate::from_template(BOX_OFFICE_PROMPT))
    }

    /// Plot, cast and general facts about a film
    pub fn movie_info(llm: Arc<L>) -> Self {
        Self::new(llm, StringPromptTemplate::from_template(MOVIE_INFO_PROMPT))
    }
}

#[async_trait]
impl<L: LanguageModel + 'static> Handler for PromptHandler<L> {
    async fn handle(&self, query: &str) -> Result<String> {
        let prompt = self.template.format_pairs(&[("query", query)])?;
        self.llm.invoke(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::llms::MockLLM;

    #[tokio::test]
    async fn test_box_office_prompt_reaches_model() {
        let llm = Arc::new(MockLLM::new().with_response(
            "Search online and summarize the latest box office forecast for: Jawan. Include trends and expected earnings.",
            "Jawan is tracking for a huge opening.",
        ));
        let handler = PromptHandler::box_office(llm);
        assert_eq!(
            handler.handle("Jawan").await.unwrap(),
            "Jawan is tracking for a huge opening."
        );
    }

    #[tokio::test]
    async fn test_movie_info_uses_default_response() {
        let llm = Arc::new(MockLLM::new().with_default_response("Christopher Nolan"));
        let handler = PromptHandler::movie_info(llm);
        assert_eq!(
            handler.handle("Who directed Inception?").await.unwrap(),
            "Christopher Nolan"
        );
    }

    #[tokio::test]
    async fn test_template_without_query_is_an_error() {
        let llm = Arc::new(MockLLM::new());
        let handler = PromptHandler::new(llm, StringPromptTemplate::from_template("{title}"));
        assert!(matches!(
            handler.handle("x").await,
            Err(Error::PromptTemplate(_))
        ));
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let llm = Arc::new(MockLLM::new().with_failure("quota exceeded"));
        let handler = PromptHandler::box_office(llm);
        let err = handler.handle("Budget of Avatar").await.unwrap_err();
        assert!(matches!(err, Error::LLM(ref msg) if msg == "quota exceeded"));
    }
}
