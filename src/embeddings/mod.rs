pub mod hashing;

pub use hashing::HashingEmbeddings;
