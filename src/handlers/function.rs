use async_trait::async_trait;
use std::sync::Arc;

use crate::traits::Handler;
use crate::Result;

/// Type alias for synchronous handler functions
pub type HandlerFn = Arc<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// A handler that wraps a function
#[derive(Clone)]
pub struct FnHandler(HandlerFn);

impl FnHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }
}

#[async_trait]
impl Handler for FnHandler {
    async fn handle(&self, query: &str) -> Result<String> {
        (self.0)(query)
    }
}

/// Create a handler from a function
pub fn handler_fn<F>(f: F) -> FnHandler
where
    F: Fn(&str) -> Result<String> + Send + Sync + 'static,
{
    FnHandler::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_fn_handler() {
        let upper = handler_fn(|q: &str| Ok(q.to_uppercase()));
        assert_eq!(upper.handle("avatar").await.unwrap(), "AVATAR");

        let failing = handler_fn(|_: &str| Err(Error::Other("boom".to_string())));
        assert!(failing.handle("x").await.is_err());
    }
}
