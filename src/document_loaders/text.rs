use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::Error;
use crate::schema::Document;
use crate::traits::DocumentLoader;
use crate::Result;

/// Loads a UTF-8 text file as a single document tagged with its `source` path
pub struct TextLoader {
    file_path: PathBuf,
}

impl TextLoader {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DocumentLoader for TextLoader {
    async fn load(&self) -> Result<Vec<Document>> {
        let path = self.file_path.display();
        let metadata = fs::metadata(&self.file_path)
            .await
            .map_err(|e| Error::DocumentLoader(format!("Cannot open {}: {}", path, e)))?;
        if !metadata.is_file() {
            return Err(Error::DocumentLoader(format!("Not a file: {}", path)));
        }

        let content = fs::read_to_string(&self.file_path)
            .await
            .map_err(|e| Error::DocumentLoader(format!("Cannot read {}: {}", path, e)))?;

        Ok(vec![Document::new(content)
            .with_metadata("source", self.file_path.to_string_lossy().to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_load_text_file() {
        let path = std::env::temp_dir().join(format!("marquee-{}.txt", Uuid::new_v4()));
        fs::write(&path, "Sponsors receive logo placement.").await.unwrap();

        let docs = TextLoader::new(&path).load().await.unwrap();
        fs::remove_file(&path).await.unwrap();

        let source = path.to_string_lossy().to_string();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].page_content, "Sponsors receive logo placement.");
        assert_eq!(
            docs[0].metadata.get("source").and_then(|v| v.as_str()),
            Some(source.as_str())
        );
    }

    #[tokio::test]
    async fn test_missing_file() {
        let path = std::env::temp_dir().join(format!("marquee-missing-{}.txt", Uuid::new_v4()));
        assert!(matches!(
            TextLoader::new(path).load().await,
            Err(Error::DocumentLoader(_))
        ));
    }

    #[tokio::test]
    async fn test_directory_is_rejected() {
        let result = TextLoader::new(std::env::temp_dir()).load().await;
        assert!(matches!(result, Err(Error::DocumentLoader(msg)) if msg.starts_with("Not a file")));
    }
}
