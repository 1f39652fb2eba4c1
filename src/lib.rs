pub mod config;
pub mod document_loaders;
pub mod embeddings;
pub mod error;
pub mod handlers;
pub mod intents;
pub mod llms;
pub mod logging;
pub mod memory;
pub mod prompts;
pub mod router;
pub mod schema;
pub mod serialization;
pub mod text_splitters;
pub mod traits;
pub mod vectorstores;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Re-exports for common types
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::handlers::*;
    pub use crate::intents::*;
    pub use crate::memory::*;
    pub use crate::router::*;
    pub use crate::schema::*;
    pub use crate::serialization::*;
    pub use crate::traits::*;
    pub use crate::Result;
}
