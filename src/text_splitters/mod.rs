pub mod character;

pub use character::CharacterTextSplitter;
