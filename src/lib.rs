//! `toolshed` is a utility belt of small text, number, color and identifier
//! tools usable from the command line or as a library.
//!
//! The core of the crate is the transformation engine in [`transforms`]: named,
//! pure `text -> text` operations dispatched through a registry. The other
//! modules are independent tools built around a single library call each.
//!
//! "Hello world" example:
//! ```
//! use toolshed::prelude::*;
//!
//! let manager = TransformManager::get();
//! let title = manager.text().apply("title", "hello world", &Options::new()).unwrap();
//! assert_eq!(title, "Hello World");
//!
//! let amount = manager
//!     .numeric()
//!     .apply("currency", "-1234.5", &Options::new())
//!     .unwrap();
//! assert_eq!(amount, "-$1,234.50");
//! ```

#[cfg(feature = "fetcher")]
pub mod assistant;
#[cfg(feature = "imaging")]
pub mod avatar;
#[cfg(feature = "imaging")]
pub mod canvas;
pub mod collaborators;
pub mod color;
pub mod config;
pub mod constants;
pub mod context;
pub mod controller;
pub mod error;
#[cfg(feature = "fetcher")]
pub mod fetcher;
pub mod generators;
#[cfg(feature = "fetcher")]
pub mod jokes;
pub mod json;
pub mod log;
#[cfg(feature = "imaging")]
pub mod qr;
pub mod stopwatch;
pub mod string_utils;
pub mod todo;
pub mod transforms;
pub mod utils;

/// The toolshed prelude
///
/// This module re-exports the most commonly used items from toolshed.
/// You can use it with `use toolshed::prelude::*;` to bring all common items into scope.
pub mod prelude {
    // Re-export commonly used traits
    pub use crate::collaborators::{ClipboardWriter, FileAccess, Notifier};
    pub use crate::transforms::Transform;

    // Re-export commonly used types
    pub use crate::context::{AppContext, Theme};
    pub use crate::controller::{Delivery, ToolsController};
    pub use crate::error::{Error, Result};
    pub use crate::transforms::{Options, TransformManager, TransformRegistry, TransformRequest};
}
