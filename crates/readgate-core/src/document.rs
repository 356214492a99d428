//! Documents under analysis.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{InputError, InputResult};

/// A Markdown document: where it came from and its full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: Utf8PathBuf,
    source: String,
}

impl Document {
    /// Wrap text that is already in memory.
    pub fn new(path: impl Into<Utf8PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Build a document from raw bytes, replacing invalid UTF-8.
    pub fn from_bytes(path: impl Into<Utf8PathBuf>, bytes: &[u8]) -> Self {
        let path = path.into();
        let source = match String::from_utf8_lossy(bytes) {
            std::borrow::Cow::Borrowed(text) => text.to_string(),
            std::borrow::Cow::Owned(text) => {
                tracing::warn!(%path, "invalid UTF-8 replaced");
                text
            }
        };
        Self { path, source }
    }

    /// Read a document from disk.
    ///
    /// The size is checked against `max_bytes` from metadata before the file
    /// is read into memory.
    #[tracing::instrument(skip_all, fields(%path))]
    pub fn read(path: &Utf8Path, max_bytes: Option<usize>) -> InputResult<Self> {
        let read_error = |source| InputError::Read {
            path: path.to_path_buf(),
            source,
        };

        let metadata = std::fs::metadata(path.as_std_path()).map_err(read_error)?;
        if let Some(limit) = max_bytes
            && metadata.len() > limit as u64
        {
            return Err(InputError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit,
            });
        }

        let bytes = std::fs::read(path.as_std_path()).map_err(read_error)?;
        tracing::debug!(bytes = bytes.len(), "document read");
        Ok(Self::from_bytes(path, &bytes))
    }

    /// Where the document came from.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The full document text.
    pub fn source(&self) -> &str {
        &self.source
    }
}
