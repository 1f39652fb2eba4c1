use crate::error::Error;
use crate::traits::TextSplitter;
use crate::Result;

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Splits text on the coarsest separator it contains (paragraphs, then lines,
/// then words, then characters), recursing into pieces that are still too long,
/// and merges the pieces back into chunks of at most `chunk_size` characters.
///
/// Consecutive chunks share up to `chunk_overlap` characters of context.
#[derive(Debug, Clone)]
pub struct CharacterTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    /// Ordered by priority; an empty separator splits into characters
    separators: Vec<String>,
}

impl Default for CharacterTextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                " ".to_string(),
                String::new(),
            ],
        }
    }
}

impl CharacterTextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("Chunk size must be positive".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::Config(format!(
                "Chunk overlap ({}) must be less than chunk size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            ..Default::default()
        })
    }

    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        if separators.is_empty() {
            return vec![text.to_string()];
        }

        let index = separators
            .iter()
            .position(|s| s.is_empty() || text.contains(s.as_str()))
            .unwrap_or(separators.len() - 1);
        let separator = separators[index].as_str();
        let finer = &separators[index + 1..];

        let pieces: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        };

        let mut chunks = Vec::new();
        let mut fitting = Vec::new();
        for piece in pieces {
            if char_len(&piece) <= self.chunk_size {
                fitting.push(piece);
                continue;
            }
            if !fitting.is_empty() {
                chunks.extend(self.merge(std::mem::take(&mut fitting), separator));
            }
            if finer.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_recursive(&piece, finer));
            }
        }
        if !fitting.is_empty() {
            chunks.extend(self.merge(fitting, separator));
        }
        chunks
    }

    /// Join pieces with `separator` into chunks no longer than `chunk_size`,
    /// carrying trailing pieces (up to `chunk_overlap`) into the next chunk.
    fn merge(&self, pieces: Vec<String>, separator: &str) -> Vec<String> {
        let separator_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(&piece);
            let joiner = if current.is_empty() { 0 } else { separator_len };

            if total + joiner + len > self.chunk_size && !current.is_empty() {
                push_chunk(&mut chunks, current.join(separator));

                while total > self.chunk_overlap
                    || (total > 0 && total + separator_len + len > self.chunk_size)
                {
                    let first = current.remove(0);
                    total -= char_len(&first);
                    if !current.is_empty() {
                        total -= separator_len;
                    }
                }
            }

            total += len + if current.is_empty() { 0 } else { separator_len };
            current.push(piece);
        }

        if !current.is_empty() {
            push_chunk(&mut chunks, current.join(separator));
        }
        chunks
    }
}

fn push_chunk(chunks: &mut Vec<String>, chunk: String) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

impl TextSplitter for CharacterTextSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.split_recursive(text, &self.separators))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Document;

    #[test]
    fn test_words_merge_with_overlap() {
        let splitter = CharacterTextSplitter::new(10, 4).unwrap();
        assert_eq!(
            splitter.split_text("one two three four five").unwrap(),
            vec!["one two", "two three", "four five"]
        );
    }

    #[test]
    fn test_long_words_fall_back_to_characters() {
        let splitter = CharacterTextSplitter::new(4, 0).unwrap();
        assert_eq!(
            splitter.split_text("abcdefgh ij").unwrap(),
            vec!["abcd", "efgh", "ij"]
        );
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let splitter = CharacterTextSplitter::default();
        assert_eq!(
            splitter.split_text("Avatar (2009)\n\nDirected by James Cameron.").unwrap(),
            vec!["Avatar (2009)\n\nDirected by James Cameron."]
        );
        assert!(splitter.split_text("").unwrap().is_empty());
    }

    #[test]
    fn test_paragraphs_split_before_words() {
        let splitter = CharacterTextSplitter::new(20, 0).unwrap();
        assert_eq!(
            splitter
                .split_text("First paragraph.\n\nSecond paragraph.")
                .unwrap(),
            vec!["First paragraph.", "Second paragraph."]
        );
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(matches!(
            CharacterTextSplitter::new(0, 0),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            CharacterTextSplitter::new(100, 100),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_split_documents_keeps_metadata() {
        let splitter = CharacterTextSplitter::new(10, 0).unwrap();
        let docs = vec![Document::new("alpha beta gamma").with_metadata("source", "notes.txt")];

        let chunks = splitter.split_documents(docs).unwrap();
        let texts: Vec<&str> = chunks.iter().map(|d| d.page_content.as_str()).collect();
        assert_eq!(texts, vec!["alpha beta", "gamma"]);
        assert!(chunks
            .iter()
            .all(|d| d.metadata.get("source").and_then(|v| v.as_str()) == Some("notes.txt")));
    }
}
