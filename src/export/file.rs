//! Plain-text file sink
//!
//! Writes the prompt as UTF-8 `text/plain` into an output directory.

use super::{ExportError, FileSink, DEFAULT_FILE_NAME};
use std::path::PathBuf;

/// Writes exported prompts into a fixed directory
#[derive(Debug, Clone)]
pub struct DirectoryFileSink {
    dir: PathBuf,
}

impl DirectoryFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSink for DirectoryFileSink {
    fn target(&self, file_name: &str) -> PathBuf {
        self.dir.join(sanitize_filename(file_name))
    }

    async fn save(&self, text: &str, file_name: &str) -> Result<PathBuf, ExportError> {
        let path = self.target(file_name);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ExportError::FileWrite {
                path: self.dir.clone(),
                source,
            })?;

        tokio::fs::write(&path, text.as_bytes())
            .await
            .map_err(|source| ExportError::FileWrite {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), bytes = text.len(), "prompt saved");
        Ok(path)
    }
}

/// Sanitize a filename by replacing invalid characters.
/// A name that sanitizes to nothing falls back to the default file name.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        DEFAULT_FILE_NAME.to_string()
    } else {
        cleaned
    }
}
