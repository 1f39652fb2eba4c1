pub mod gemini;
pub mod mock;

pub use gemini::{select_model, GeminiLLM, ModelInfo};
pub use mock::MockLLM;
