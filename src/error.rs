use std::io;
use thiserror::Error;

/// Error type for the marquee crate
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed router setup or missing settings, detected before any query is routed
    #[error("Configuration error: {0}")]
    Config(String),

    /// The handler selected for a query failed.
    ///
    /// `route` is the label of the route that was taken, so callers can still
    /// report which path the query went down.
    #[error("the {route} handler failed: {source}")]
    Handler {
        route: String,
        #[source]
        source: Box<Error>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization or deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// LLM error
    #[error("LLM error: {0}")]
    LLM(String),

    /// HTTP request error
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Prompt template error
    #[error("Prompt template error: {0}")]
    PromptTemplate(String),

    /// Document loader error
    #[error("Document loader error: {0}")]
    DocumentLoader(String),

    /// Document retrieval error
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Session store error
    #[error("State error: {0}")]
    State(String),

    /// Other failures, shown to the user as-is
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Label of the route whose handler failed, if this is a handler failure
    pub fn route(&self) -> Option<&str> {
        match self {
            Error::Handler { route, .. } => Some(route),
            _ => None,
        }
    }
}
