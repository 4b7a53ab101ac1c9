use crate::error::{invalid, Result};

pub mod case;
pub mod formatter;
pub mod number;
mod registry;
mod transform;

pub use number::{format_number, NumberStyle};
pub use registry::{OperationDescriptor, TransformManager, TransformRegistry};
pub use transform::{Options, Transform};

/// A single user invocation against the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub source_text: String,
    pub operation_id: String,
    pub options: Options,
}

impl TransformRequest {
    pub fn new<T: Into<String>, I: Into<String>>(source_text: T, operation_id: I) -> Self {
        Self {
            source_text: source_text.into(),
            operation_id: operation_id.into(),
            options: Options::new(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Rejects requests whose source text has nothing to transform
    pub fn validate(&self) -> Result<()> {
        if self.source_text.trim().is_empty() {
            return Err(invalid("no text to transform"));
        }
        Ok(())
    }
}

/// The outcome of applying a `TransformRequest`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub output_text: String,
    pub operation_id: String,
}
