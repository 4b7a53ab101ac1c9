//! Capabilities the tools rely on to talk to the outside world.
//!
//! Every capability is a trait with a platform backed implementation and an
//! in-memory one usable without a terminal, a clipboard or a speaker.

pub mod clipboard;
pub mod files;
pub mod notify;
pub mod picker;
pub mod speech;

pub use clipboard::{ClipboardWriter, MemoryClipboard, SystemClipboard};
pub use files::{FileAccess, FsFileAccess, MemoryFileAccess};
pub use notify::{ConsoleNotifier, NoticeKind, Notifier, RecordingNotifier};
pub use picker::{ColorPicker, FixedColorPicker, PromptColorPicker};
pub use speech::{CommandSynthesizer, NullSynthesizer, SpeechOptions, SpeechSynthesizer};
