use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::collaborators::{ClipboardWriter, FileAccess, NoticeKind, Notifier};
use crate::debug;
use crate::error::*;
use crate::utils::{self, with_date_stamp};

/// Where the result of a tool should go besides the standard output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Copy the result to the clipboard
    pub copy: bool,
    /// Save the result. An empty name means the name suggested by the tool.
    pub output: Option<String>,
}

impl Delivery {
    pub fn new(copy: bool, output: Option<String>) -> Self {
        Self { copy, output }
    }
}

/// Reads tool inputs and delivers their results through the collaborators:
/// the standard output, the clipboard and the output directory.
pub struct ToolsController<'a> {
    files: &'a dyn FileAccess,
    clipboard: &'a dyn ClipboardWriter,
    notifier: &'a dyn Notifier,
    /// Date appended to suggested file names
    date_stamp: Option<NaiveDate>,
}

impl<'a> ToolsController<'a> {
    pub fn new(
        files: &'a dyn FileAccess,
        clipboard: &'a dyn ClipboardWriter,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            files,
            clipboard,
            notifier,
            date_stamp: None,
        }
    }

    pub fn with_date_stamp(mut self, date: Option<NaiveDate>) -> Self {
        self.date_stamp = date;
        self
    }

    pub fn files(&self) -> &dyn FileAccess {
        self.files
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier
    }

    /// Returns the text to process: the explicit text, then the file, then
    /// everything available on `stdin`
    ///
    /// # Errors
    /// * `FileTooLarge` - the file or the piped input exceed `limit`
    /// * `FileReadError` - the file cannot be read
    pub fn read_input(
        &self,
        text: Option<&str>,
        file: Option<&Path>,
        stdin: &mut dyn Read,
        limit: u64,
    ) -> Result<String> {
        if let Some(text) = text {
            return Ok(text.to_string());
        }
        if let Some(path) = file {
            let text = self.files.read_text_file(path, limit)?;
            self.notifier.notify(
                &format!("Loaded {} ({})", path.display(), utils::format_bytes(text.len() as u64)),
                NoticeKind::Info,
            );
            return Ok(text);
        }
        let mut buffer = Vec::new();
        stdin.take(limit + 1).read_to_end(&mut buffer)?;
        if buffer.len() as u64 > limit {
            return Err(Error::FileTooLarge {
                file: "<stdin>".to_string(),
                size: buffer.len() as u64,
                limit,
            });
        }
        String::from_utf8(buffer).map_err(|e| Error::FileReadError {
            file: "<stdin>".to_string(),
            cause: e.to_string(),
        })
    }

    /// Name of the file a result is saved to
    pub fn target_name(&self, requested: &str, suggested: &str) -> String {
        if !requested.is_empty() {
            return requested.to_string();
        }
        match self.date_stamp {
            Some(date) => with_date_stamp(suggested, date),
            None => suggested.to_string(),
        }
    }

    /// Prints the result and performs the requested copy and download
    pub fn deliver(
        &self,
        output: &mut dyn Write,
        text: &str,
        suggested_name: &str,
        delivery: &Delivery,
    ) -> Result<()> {
        writeln!(output, "{}", text)?;
        if delivery.copy {
            self.clipboard.write_text(text)?;
            self.notifier.notify("Copied to clipboard!", NoticeKind::Success);
        }
        if let Some(requested) = &delivery.output {
            self.save(text.as_bytes(), &self.target_name(requested, suggested_name))?;
        }
        Ok(())
    }

    /// Saves binary results such as images, which are never printed
    pub fn deliver_bytes(&self, bytes: &[u8], suggested_name: &str, delivery: &Delivery) -> Result<PathBuf> {
        let requested = delivery.output.as_deref().unwrap_or("");
        self.save(bytes, &self.target_name(requested, suggested_name))
    }

    fn save(&self, contents: &[u8], filename: &str) -> Result<PathBuf> {
        let path = self.files.write_file(filename, contents)?;
        debug!("Saved {} bytes as {}", contents.len(), path.display());
        self.notifier
            .notify(&format!("Downloaded {}", path.display()), NoticeKind::Success);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{MemoryClipboard, MemoryFileAccess, RecordingNotifier};
    use std::io::Cursor;

    struct Fixture {
        files: MemoryFileAccess,
        clipboard: MemoryClipboard,
        notifier: RecordingNotifier,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                files: MemoryFileAccess::new().with_file("in.txt", "from file"),
                clipboard: MemoryClipboard::new(),
                notifier: RecordingNotifier::new(),
            }
        }

        fn controller(&self) -> ToolsController<'_> {
            ToolsController::new(&self.files, &self.clipboard, &self.notifier)
        }
    }

    #[test]
    fn test_read_input_precedence() {
        let fixture = Fixture::new();
        let controller = fixture.controller();
        let mut stdin = Cursor::new("from stdin");

        let text = controller
            .read_input(Some("explicit"), Some(Path::new("in.txt")), &mut stdin, 100)
            .unwrap();
        assert_eq!(text, "explicit");
        let text = controller
            .read_input(None, Some(Path::new("in.txt")), &mut stdin, 100)
            .unwrap();
        assert_eq!(text, "from file");
        assert_eq!(controller.read_input(None, None, &mut stdin, 100).unwrap(), "from stdin");
    }

    #[test]
    fn test_piped_input_limit() {
        let fixture = Fixture::new();
        let mut stdin = Cursor::new(vec![b'a'; 11]);
        assert!(matches!(
            fixture.controller().read_input(None, None, &mut stdin, 10),
            Err(Error::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_deliver_copy_and_download() {
        let fixture = Fixture::new();
        let mut output = Vec::new();
        fixture
            .controller()
            .deliver(&mut output, "HELLO", "converted-upper.txt", &Delivery::new(true, Some(String::new())))
            .unwrap();

        assert_eq!(output, b"HELLO\n");
        assert_eq!(fixture.clipboard.contents().as_deref(), Some("HELLO"));
        assert_eq!(fixture.files.contents("converted-upper.txt"), Some(b"HELLO".to_vec()));
        let notices = fixture.notifier.notices();
        assert_eq!(notices[0], ("Copied to clipboard!".to_string(), NoticeKind::Success));
        assert!(notices[1].0.starts_with("Downloaded"));
    }

    #[test]
    fn test_target_name() {
        let fixture = Fixture::new();
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let controller = fixture.controller().with_date_stamp(Some(date));
        assert_eq!(controller.target_name("", "uuids.txt"), "uuids-2024-02-29.txt");
        assert_eq!(controller.target_name("mine.txt", "uuids.txt"), "mine.txt");

        let path = controller
            .deliver_bytes(&[1, 2, 3], "shaped-image-circle.png", &Delivery::default())
            .unwrap();
        assert_eq!(path, PathBuf::from("shaped-image-circle-2024-02-29.png"));
    }
}
