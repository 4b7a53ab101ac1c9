use std::cell::RefCell;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::debug;
use crate::error::{Error, Result};
use crate::utils::command_exists;

pub trait ClipboardWriter {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Programs able to receive the clipboard contents on their standard input,
/// in order of preference
const CLIPBOARD_COMMANDS: [(&str, &[&str]); 5] = [
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

/// Clipboard backed by the platform copy utility
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    command: Option<(&'static str, &'static [&'static str])>,
}

impl SystemClipboard {
    /// Looks for the first available copy utility
    pub fn detect() -> Self {
        let command = CLIPBOARD_COMMANDS
            .iter()
            .find(|(program, _)| command_exists(program))
            .copied();
        debug!("Clipboard command: {:?}", command.map(|(program, _)| program));
        Self { command }
    }

    pub fn is_available(&self) -> bool {
        self.command.is_some()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let (program, args) = self.command.ok_or_else(|| {
            Error::ClipboardUnavailable(
                "none of pbcopy, wl-copy, xclip, xsel or clip was found".to_string(),
            )
        })?;
        let unavailable = |e: std::io::Error| Error::ClipboardUnavailable(format!("{}: {}", program, e));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(unavailable)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).map_err(unavailable)?;
        }
        let status = child.wait().map_err(unavailable)?;
        if !status.success() {
            return Err(Error::ClipboardUnavailable(format!(
                "{} exited with {}",
                program, status
            )));
        }
        Ok(())
    }
}

/// Clipboard keeping the last copied text in memory
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: RefCell<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}
