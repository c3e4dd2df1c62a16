//! Document retrieval boundary
//!
//! Markdown documents live behind the `DocumentFetcher` trait, the only I/O
//! the rendering core performs. Documents are addressed by bare name
//! (`thinking-prpl`, `404`) and the fetcher maps that to its own storage,
//! by convention `<doc_root>/<name>.<ext>`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Document retrieval errors
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("failed to read document `{name}`: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Asynchronous source of raw markdown documents
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Retrieve the raw markdown document addressed by `name`
    async fn fetch(&self, name: &str) -> Result<String, FetchError>;
}

/// Filesystem-backed fetcher reading `<doc_root>/<name>.<ext>`
pub struct FsFetcher {
    doc_root: PathBuf,
    ext: String,
}

impl FsFetcher {
    /// Create a fetcher rooted at `doc_root`, serving `.md` documents
    pub fn new<P: AsRef<Path>>(doc_root: P) -> Self {
        Self::with_ext(doc_root, "md")
    }

    /// Create a fetcher with a custom document extension
    pub fn with_ext<P: AsRef<Path>>(doc_root: P, ext: &str) -> Self {
        Self {
            doc_root: doc_root.as_ref().to_path_buf(),
            ext: ext.to_string(),
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.doc_root.join(format!("{}.{}", name, self.ext))
    }
}

#[async_trait]
impl DocumentFetcher for FsFetcher {
    async fn fetch(&self, name: &str) -> Result<String, FetchError> {
        // Names come from navigation params; anything that could escape
        // doc_root is treated as absent.
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(FetchError::NotFound(name.to_string()));
        }

        let path = self.path_for(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(name.to_string()))
            }
            Err(source) => Err(FetchError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.md"), "# Hello").unwrap();

        let fetcher = FsFetcher::new(dir.path());
        let doc = fetcher.fetch("hello").await.unwrap();
        assert_eq!(doc, "# Hello");
    }

    #[tokio::test]
    async fn test_fetch_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FsFetcher::new(dir.path());
        let err = fetcher.fetch("nope").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(name) if name == "nope"));
    }

    #[tokio::test]
    async fn test_traversal_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FsFetcher::new(dir.path());
        for name in ["../secret", "a/b", "..", ""] {
            let err = fetcher.fetch(name).await.unwrap_err();
            assert!(matches!(err, FetchError::NotFound(_)), "name: {:?}", name);
        }
    }

    #[tokio::test]
    async fn test_custom_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.markdown"), "hi").unwrap();

        let fetcher = FsFetcher::with_ext(dir.path(), "markdown");
        assert_eq!(fetcher.fetch("hello").await.unwrap(), "hi");
    }
}
