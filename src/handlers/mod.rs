pub mod function;
pub mod prompt;
pub mod retrieval;
pub mod showtimes;
pub mod static_reply;

pub use function::{handler_fn, FnHandler};
pub use prompt::PromptHandler;
pub use retrieval::RetrievalQaHandler;
pub use showtimes::ShowtimeHandler;
pub use static_reply::StaticHandler;
