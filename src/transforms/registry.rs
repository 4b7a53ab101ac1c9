use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::number::{NumberFormatter, NumberStyle, DECIMAL_PLACES_OPTION};
use super::{case, formatter, Options, Transform, TransformRequest, TransformResult};
use crate::debug;
use crate::error::{invalid, Error, Result};

/// A registered operation: its identifier, display label, recognized options
/// and implementation
pub struct OperationDescriptor {
    pub id: String,
    pub label: String,
    pub valid_options: BTreeSet<String>,
    transform: Box<dyn Transform>,
}

impl OperationDescriptor {
    /// Applies the operation after checking that every supplied option is recognized
    pub fn apply(&self, text: &str, options: &Options) -> Result<String> {
        if let Some(unknown) = options.keys().find(|k| !self.valid_options.contains(*k)) {
            return Err(invalid(format!(
                "option \"{}\" is not recognized by operation \"{}\"",
                unknown, self.id
            )));
        }
        self.transform.transform(text, options)
    }
}

impl fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("valid_options", &self.valid_options)
            .finish()
    }
}

#[derive(Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, Arc<OperationDescriptor>>,
    order: Vec<Arc<OperationDescriptor>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Builds the registry of text operations
    /// - Case conversions: upper, lower, title, sentence, reverse, alternating,
    ///   inverse, camel, kebab, snake, pascal
    /// - Formatting clean-ups: remove-spaces, remove-line-breaks,
    ///   remove-duplicates, trim-lines, slugify
    pub fn text() -> Self {
        let mut registry = Self::new();
        registry.init_text();
        registry
    }

    /// Builds the registry of number formatting operations, one per `NumberStyle`
    pub fn numeric() -> Self {
        let mut registry = Self::new();
        registry.init_numeric();
        registry
    }

    fn init_text(&mut self) {
        let builtins: [(&str, &str, fn(&str) -> String); 16] = [
            ("upper", "UPPERCASE", case::upper),
            ("lower", "lowercase", case::lower),
            ("title", "Title Case", case::title),
            ("sentence", "Sentence case", case::sentence),
            ("reverse", "Reverse text", case::reverse),
            ("alternating", "aLtErNaTiNg cAsE", case::alternating),
            ("inverse", "iNVERSE cASE", case::inverse),
            ("camel", "camelCase", case::camel),
            ("kebab", "kebab-case", case::kebab),
            ("snake", "snake_case", case::snake),
            ("pascal", "PascalCase", case::pascal),
            ("remove-spaces", "Remove extra spaces", formatter::remove_spaces),
            ("remove-line-breaks", "Remove line breaks", formatter::remove_line_breaks),
            ("remove-duplicates", "Remove duplicate words", formatter::remove_duplicates),
            ("trim-lines", "Trim lines", formatter::trim_lines),
            ("slugify", "slugify", case::kebab),
        ];
        for (id, label, function) in builtins {
            let operation = move |text: &str, _: &Options| -> Result<String> { Ok(function(text)) };
            self.register(id, label, &[], operation)
                .expect("built-in text operations have unique ids");
        }
    }

    fn init_numeric(&mut self) {
        for style in NumberStyle::ALL {
            self.register(
                &style.to_string(),
                style.label(),
                &[DECIMAL_PLACES_OPTION],
                NumberFormatter::new(style),
            )
            .expect("built-in numeric operations have unique ids");
        }
    }

    /// Registers a new operation
    ///
    /// # Arguments
    /// * `id` - The unique operation identifier
    /// * `label` - The display name
    /// * `options` - The option names recognized by the operation
    /// * `transform` - The implementation
    ///
    /// # Errors
    /// Returns `DuplicateOperation` if the identifier is already registered
    pub fn register<T: Transform + 'static>(
        &mut self,
        id: &str,
        label: &str,
        options: &[&str],
        transform: T,
    ) -> Result<()> {
        if self.transforms.contains_key(id) {
            return Err(Error::DuplicateOperation(id.to_string()));
        }
        let descriptor = Arc::new(OperationDescriptor {
            id: id.to_string(),
            label: label.to_string(),
            valid_options: options.iter().map(|o| o.to_string()).collect(),
            transform: Box::new(transform),
        });
        self.transforms.insert(id.to_string(), Arc::clone(&descriptor));
        self.order.push(descriptor);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<OperationDescriptor>> {
        self.transforms.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.transforms.contains_key(id)
    }

    /// The registered operations in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.order.iter().map(|d| d.as_ref())
    }

    /// Applies the operation registered under `id`
    ///
    /// # Arguments
    /// * `id` - The operation identifier
    /// * `text` - The text to transform
    /// * `options` - The operation options
    ///
    /// # Returns
    /// The transformed text or an error if the operation is unknown or fails
    pub fn apply(&self, id: &str, text: &str, options: &Options) -> Result<String> {
        let descriptor = self
            .get(id)
            .ok_or_else(|| Error::UnknownOperation(id.to_string()))?;
        debug!("Applying \"{}\" to {} chars", id, text.chars().count());
        descriptor.apply(text, options)
    }

    /// Validates and applies a full request
    pub fn apply_request(&self, request: &TransformRequest) -> Result<TransformResult> {
        request.validate()?;
        let output_text = self.apply(&request.operation_id, &request.source_text, &request.options)?;
        Ok(TransformResult {
            output_text,
            operation_id: request.operation_id.clone(),
        })
    }
}

/// Process wide access to the read-only built-in registries
pub struct TransformManager {
    text: Arc<TransformRegistry>,
    numeric: Arc<TransformRegistry>,
}

impl TransformManager {
    /// Gets a reference to the global transform manager
    pub fn get() -> &'static TransformManager {
        static INSTANCE: Lazy<TransformManager> = Lazy::new(|| TransformManager {
            text: Arc::new(TransformRegistry::text()),
            numeric: Arc::new(TransformRegistry::numeric()),
        });
        &INSTANCE
    }

    pub fn text(&self) -> Arc<TransformRegistry> {
        Arc::clone(&self.text)
    }

    pub fn numeric(&self) -> Arc<TransformRegistry> {
        Arc::clone(&self.numeric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_registry_examples() {
        let registry = TransformRegistry::text();
        let none = Options::new();
        assert_eq!(
            registry.apply("title", "the quick brown fox", &none).unwrap(),
            "The Quick Brown Fox"
        );
        assert_eq!(
            registry.apply("kebab", "Hello World! 123", &none).unwrap(),
            "hello-world-123"
        );
        assert_eq!(
            registry.apply("slugify", "Hello World! 123", &none).unwrap(),
            "hello-world-123"
        );
    }

    #[test]
    fn test_properties_hold_through_dispatch() {
        let registry = TransformRegistry::text();
        let none = Options::new();
        for s in ["", "Hello", "mIxEd CaSe 123", "ünïcödé ✓"] {
            let once = registry.apply("upper", s, &none).unwrap();
            assert_eq!(registry.apply("upper", &once, &none).unwrap(), once);
            let once = registry.apply("lower", s, &none).unwrap();
            assert_eq!(registry.apply("lower", &once, &none).unwrap(), once);
            let reversed = registry.apply("reverse", s, &none).unwrap();
            assert_eq!(registry.apply("reverse", &reversed, &none).unwrap(), s);
        }
    }

    #[test]
    fn test_unknown_operation() {
        let registry = TransformRegistry::text();
        assert!(matches!(
            registry.apply("shout", "text", &Options::new()),
            Err(Error::UnknownOperation(id)) if id == "shout"
        ));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = TransformRegistry::text();
        let louder = |t: &str, _: &Options| -> Result<String> { Ok(format!("{}!", t)) };
        let result = registry.register("upper", "Louder", &[], louder);
        assert!(matches!(result, Err(Error::DuplicateOperation(id)) if id == "upper"));
        assert_eq!(
            registry.apply("upper", "still", &Options::new()).unwrap(),
            "STILL"
        );
    }

    #[test]
    fn test_unrecognized_option_is_rejected() {
        let registry = TransformRegistry::text();
        let options = Options::new().with("decimal_places", 2);
        assert!(matches!(
            registry.apply("upper", "text", &options),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn test_numeric_registry() {
        let registry = TransformRegistry::numeric();
        let ids: Vec<&str> = registry.descriptors().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["comma", "indian", "scientific", "currency"]);

        let options = Options::new().with(DECIMAL_PLACES_OPTION, 2);
        assert_eq!(registry.apply("comma", "1234.5", &options).unwrap(), "1,234.50");
        assert_eq!(
            registry
                .apply("indian", "1234567", &Options::new().with(DECIMAL_PLACES_OPTION, 0))
                .unwrap(),
            "12,34,567"
        );
        assert!(matches!(
            registry.apply("comma", "twelve", &options),
            Err(Error::NotANumber(_))
        ));
    }

    #[test]
    fn test_apply_request() {
        let registry = TransformManager::get().text();
        let result = registry
            .apply_request(&TransformRequest::new("make me loud", "upper"))
            .unwrap();
        assert_eq!(result.output_text, "MAKE ME LOUD");
        assert_eq!(result.operation_id, "upper");

        assert!(matches!(
            registry.apply_request(&TransformRequest::new("   ", "upper")),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn test_descriptors_keep_registration_order() {
        let registry = TransformRegistry::text();
        let first: Vec<&str> = registry.descriptors().take(3).map(|d| d.label.as_str()).collect();
        assert_eq!(first, vec!["UPPERCASE", "lowercase", "Title Case"]);
        assert!(registry.contains("trim-lines"));
    }
}
