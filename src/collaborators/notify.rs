use std::cell::RefCell;
use std::io::Write;

use strum_macros::Display;

use crate::context::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NoticeKind {
    #[strum(serialize = "success")]
    Success,
    #[strum(serialize = "error")]
    Error,
    #[strum(serialize = "info")]
    Info,
}

/// Short-lived user facing messages ("Copied to clipboard!", ...)
pub trait Notifier {
    fn notify(&self, message: &str, kind: NoticeKind);
}

/// Writes notices to stderr using the palette of the current theme
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    theme: Theme,
    quiet: bool,
    colored: bool,
}

impl ConsoleNotifier {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            quiet: false,
            colored: true,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Renders the notice line without writing it
    pub fn render(&self, message: &str, kind: NoticeKind) -> String {
        let symbol = match kind {
            NoticeKind::Success => "✔",
            NoticeKind::Error => "✖",
            NoticeKind::Info => "ℹ",
        };
        let line = format!("{} {}", symbol, message);
        if !self.colored {
            return line;
        }
        let palette = self.theme.palette();
        let color = match kind {
            NoticeKind::Success => palette.success,
            NoticeKind::Error => palette.error,
            NoticeKind::Info => palette.info,
        };
        color.paint(line).to_string()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        // Errors are always shown
        if self.quiet && kind != NoticeKind::Error {
            return;
        }
        let stderr = std::io::stderr();
        writeln!(stderr.lock(), "{}", self.render(message, kind)).ok();
    }
}

/// Keeps every notice for later inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<(String, NoticeKind)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(String, NoticeKind)> {
        self.notices.borrow().clone()
    }

    pub fn last(&self) -> Option<(String, NoticeKind)> {
        self.notices.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        self.notices.borrow_mut().push((message.to_string(), kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain() {
        let notifier = ConsoleNotifier::new(Theme::Light).colored(false);
        assert_eq!(
            notifier.render("Copied to clipboard!", NoticeKind::Success),
            "✔ Copied to clipboard!"
        );
        assert_eq!(notifier.render("Oops", NoticeKind::Error), "✖ Oops");
    }

    #[test]
    fn test_render_uses_theme_palette() {
        let light = ConsoleNotifier::new(Theme::Light).render("done", NoticeKind::Success);
        let dark = ConsoleNotifier::new(Theme::Dark).render("done", NoticeKind::Success);
        assert!(light.contains("done"));
        assert_ne!(light, dark);
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.notify("first", NoticeKind::Info);
        notifier.notify("second", NoticeKind::Error);
        assert_eq!(notifier.notices().len(), 2);
        assert_eq!(
            notifier.last(),
            Some(("second".to_string(), NoticeKind::Error))
        );
        assert_eq!(NoticeKind::Success.to_string(), "success");
    }
}
