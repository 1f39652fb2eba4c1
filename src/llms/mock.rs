use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Error;
use crate::schema::Message;
use crate::traits::{ChatModel, LanguageModel, Runnable};
use crate::Result;

/// A mock LLM implementation for testing and offline runs
pub struct MockLLM {
    responses: HashMap<String, String>,
    default_response: String,
    failure: Option<String>,
}

impl Default for MockLLM {
    fn default() -> Self {
        Self {
            responses: HashMap::new(),
            default_response: "This is a mock response.".to_string(),
            failure: None,
        }
    }
}

impl MockLLM {
    /// Create a new mock LLM
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response mapping
    pub fn with_response(mut self, input: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.insert(input.into(), response.into());
        self
    }

    /// Set the default response
    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// Make every call fail with the given message
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    fn respond(&self, input: &str) -> Result<String> {
        if let Some(message) = &self.failure {
            return Err(Error::LLM(message.clone()));
        }
        Ok(self
            .responses
            .get(input)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone()))
    }
}

#[async_trait]
impl Runnable<String, String> for MockLLM {
    async fn invoke(&self, input: String) -> Result<String> {
        self.respond(&input)
    }
}

impl LanguageModel for MockLLM {
    fn model_name(&self) -> &str {
        "mock-llm"
    }

    fn parameters(&self) -> HashMap<String, Value> {
        HashMap::new()
    }
}

/// Chat replies are keyed by the content of the last message
#[async_trait]
impl Runnable<Vec<Message>, Message> for MockLLM {
    async fn invoke(&self, input: Vec<Message>) -> Result<Message> {
        let last = input
            .last()
            .ok_or_else(|| Error::LLM("No messages provided".to_string()))?;
        Ok(Message::assistant(self.respond(&last.content)?))
    }
}

impl ChatModel for MockLLM {
    fn model_name(&self) -> &str {
        "mock-llm"
    }

    fn parameters(&self) -> HashMap<String, Value> {
        HashMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MessageRole;

    #[tokio::test]
    async fn test_completion_responses() {
        let llm = MockLLM::new().with_response("hi", "hello");
        assert_eq!(llm.invoke("hi".to_string()).await.unwrap(), "hello");
        assert_eq!(
            llm.invoke("other".to_string()).await.unwrap(),
            "This is a mock response."
        );
    }

    #[tokio::test]
    async fn test_chat_replies_to_last_message() {
        let llm = MockLLM::new().with_response("second", "reply");
        let reply = llm
            .invoke(vec![Message::user("first"), Message::user("second")])
            .await
            .unwrap();
        assert_eq!(reply.role, MessageRole::Assistant);
        assert_eq!(reply.content, "reply");

        let empty: Result<Message> = llm.invoke(Vec::<Message>::new()).await;
        assert!(empty.is_err());
    }

    #[tokio::test]
    async fn test_failure_mode() {
        let llm = MockLLM::new().with_failure("network timeout");
        let err = Runnable::<String, String>::invoke(&llm, "x".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "LLM error: network timeout");
    }

    #[tokio::test]
    async fn test_batch() {
        let llm = MockLLM::new().with_response("a", "1");
        let results = llm
            .batch(vec!["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(results[0].as_ref().unwrap(), "1");
        assert_eq!(results[1].as_ref().unwrap(), "This is a mock response.");
    }
}
