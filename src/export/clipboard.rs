//! System clipboard sink backed by `arboard`
//!
//! On X11 and Wayland the clipboard contents are served by the process that
//! set them and vanish when it exits. A long-lived interactive session can own
//! them directly; a one-shot command hands them to a detached copy of this
//! binary that keeps serving until another program replaces the selection.

use super::{ClipboardSink, ExportError};
use std::process::{Command, Stdio};

/// Hidden subcommand that serves clipboard contents read from stdin
pub const SERVE_CLIPBOARD_COMMAND: &str = "__serve-clipboard";

/// Who keeps the copied text alive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    /// This process owns the contents; fine while it keeps running
    Attached,
    /// A background process owns the contents after this one exits
    Detached,
}

/// Lazily opened handle to the OS clipboard
pub struct SystemClipboard {
    mode: ClipboardMode,
    handle: Option<arboard::Clipboard>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClipboard {
    /// Clipboard owned by the current, long-lived process
    pub fn new() -> Self {
        Self {
            mode: ClipboardMode::Attached,
            handle: None,
        }
    }

    /// Clipboard whose contents outlive the current process
    pub fn detached() -> Self {
        Self {
            mode: ClipboardMode::Detached,
            handle: None,
        }
    }

    pub fn mode(&self) -> ClipboardMode {
        self.mode
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ExportError> {
        if self.handle.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ExportError::ClipboardUnavailable(e.to_string()))?;
            self.handle = Some(clipboard);
        }
        self.handle
            .as_mut()
            .ok_or_else(|| ExportError::ClipboardUnavailable("no clipboard handle".to_string()))
    }

    fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
        self.handle()?
            .set_text(text.to_string())
            .map_err(|e| ExportError::ClipboardWrite(e.to_string()))
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ExportError> {
        match self.mode {
            ClipboardMode::Attached => self.set_text(text)?,
            ClipboardMode::Detached if cfg!(target_os = "linux") => {
                // fail here, not in the background, when there is no display
                self.handle()?;
                spawn_clipboard_server(text)?;
            }
            ClipboardMode::Detached => self.set_text(text)?,
        }
        tracing::debug!(bytes = text.len(), mode = ?self.mode, "copied prompt to clipboard");
        Ok(())
    }
}

/// Command line that starts the background clipboard server
pub fn clipboard_server_command() -> Result<Command, ExportError> {
    let exe = std::env::current_exe()
        .map_err(|e| ExportError::ClipboardWrite(format!("cannot locate executable: {e}")))?;

    let mut command = Command::new(exe);
    command
        .arg(SERVE_CLIPBOARD_COMMAND)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // keep Ctrl-C in the terminal from reaching the server
        command.process_group(0);
    }

    Ok(command)
}

fn spawn_clipboard_server(text: &str) -> Result<(), ExportError> {
    use std::io::Write;

    let mut child = clipboard_server_command()?
        .spawn()
        .map_err(|e| ExportError::ClipboardWrite(format!("cannot start clipboard server: {e}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| ExportError::ClipboardWrite("clipboard server has no stdin".to_string()))?;
    stdin
        .write_all(text.as_bytes())
        .map_err(|e| ExportError::ClipboardWrite(e.to_string()))?;
    drop(stdin);

    tracing::debug!(pid = child.id(), "clipboard server started");
    Ok(())
}

/// Own the clipboard until another program replaces its contents.
///
/// Runs inside the background process started by a detached copy.
pub fn serve_until_replaced(text: String) -> Result<(), ExportError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| ExportError::ClipboardUnavailable(e.to_string()))?;

    #[cfg(target_os = "linux")]
    {
        use arboard::SetExtLinux;
        clipboard
            .set()
            .wait()
            .text(text)
            .map_err(|e| ExportError::ClipboardWrite(e.to_string()))
    }

    #[cfg(not(target_os = "linux"))]
    {
        clipboard
            .set_text(text)
            .map_err(|e| ExportError::ClipboardWrite(e.to_string()))
    }
}

/// Copy `text`, returning a one-line status for the user instead of failing
pub fn copy_with_status<C: ClipboardSink + ?Sized>(sink: &mut C, text: &str) -> Result<String, String> {
    match sink.copy(text) {
        Ok(()) => Ok("Prompt copied to clipboard!".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "clipboard copy failed");
            Err(format!("Could not copy prompt: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::testing::MemoryClipboard;

    #[test]
    fn test_copy_with_status_success() {
        let mut sink = MemoryClipboard::default();
        let status = copy_with_status(&mut sink, "You are: Teacher.");
        assert_eq!(status.unwrap(), "Prompt copied to clipboard!");
        assert_eq!(sink.contents.as_deref(), Some("You are: Teacher."));
    }

    #[test]
    fn test_copy_with_status_reports_failure() {
        let mut sink = MemoryClipboard {
            fail: true,
            ..Default::default()
        };
        let status = copy_with_status(&mut sink, "text").unwrap_err();
        assert!(status.contains("permission denied"));
        assert!(sink.contents.is_none());
    }

    #[test]
    fn test_clipboard_modes() {
        assert_eq!(SystemClipboard::new().mode(), ClipboardMode::Attached);
        assert_eq!(SystemClipboard::detached().mode(), ClipboardMode::Detached);
    }

    #[test]
    fn test_server_command_reinvokes_self() {
        let command = clipboard_server_command().unwrap();
        assert_eq!(command.get_program(), std::env::current_exe().unwrap().as_os_str());
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec![std::ffi::OsStr::new(SERVE_CLIPBOARD_COMMAND)]);
    }
}
