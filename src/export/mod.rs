//! Export sinks for the rendered prompt
//!
//! The rendered text leaves the program through one of two sinks: the system
//! clipboard or a plain-text file.

use std::path::PathBuf;
use thiserror::Error;

pub mod clipboard;
pub mod file;

pub use clipboard::SystemClipboard;
pub use file::DirectoryFileSink;

/// Default name of the downloaded prompt file
pub const DEFAULT_FILE_NAME: &str = "ai-prompt.txt";

/// Content type of exported files
pub const CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
    #[error("failed to copy to clipboard: {0}")]
    ClipboardWrite(String),
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination that takes text and places it on a clipboard
pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<(), ExportError>;
}

/// Destination that stores text under a file name
#[allow(async_fn_in_trait)]
pub trait FileSink {
    /// Where `file_name` would be written
    fn target(&self, file_name: &str) -> PathBuf;

    /// Write `text` and return the final path
    async fn save(&self, text: &str, file_name: &str) -> Result<PathBuf, ExportError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// In-memory clipboard for exercising callers
    #[derive(Default)]
    pub struct MemoryClipboard {
        pub contents: Option<String>,
        pub fail: bool,
    }

    impl ClipboardSink for MemoryClipboard {
        fn copy(&mut self, text: &str) -> Result<(), ExportError> {
            if self.fail {
                return Err(ExportError::ClipboardWrite("permission denied".to_string()));
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }
}
