use async_trait::async_trait;

use crate::traits::Handler;
use crate::Result;

/// A handler that ignores the query and always gives the same reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHandler {
    reply: String,
}

impl StaticHandler {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }

    pub fn reply(&self) -> &str {
        &self.reply
    }
}

#[async_trait]
impl Handler for StaticHandler {
    async fn handle(&self, _query: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}
