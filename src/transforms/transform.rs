use std::collections::BTreeMap;

use crate::error::{invalid, Result};

/// Trait for the named text operations held by a `TransformRegistry`
///
/// Every operation is a pure function of its input text and options: no I/O and
/// no shared state is touched while transforming.
///
/// # Examples
///
/// ```
/// use toolshed::error::Result;
/// use toolshed::transforms::{Options, Transform};
///
/// let shout = |text: &str, _: &Options| -> Result<String> { Ok(text.to_uppercase()) };
/// assert_eq!(shout.transform("hey", &Options::new()).unwrap(), "HEY");
/// ```
pub trait Transform: Send + Sync {
    /// Transforms the input text
    ///
    /// # Arguments
    /// * `text` - The text to transform
    /// * `options` - The options recognized by the operation
    ///
    /// # Returns
    /// The transformed text or an error if transformation fails
    fn transform(&self, text: &str, options: &Options) -> Result<String>;
}

impl<F> Transform for F
where
    F: Fn(&str, &Options) -> Result<String> + Send + Sync,
{
    fn transform(&self, text: &str, options: &Options) -> Result<String> {
        self(text, options)
    }
}

/// Option values supplied to an operation, keyed by option name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    values: BTreeMap<String, String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style insertion
    pub fn with<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<K: Into<String>, V: ToString>(&mut self, key: K, value: V) {
        self.values.insert(key.into(), value.to_string());
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    /// Retrieves an unsigned byte option, falling back to the given default when absent
    pub fn get_u8(&self, key: &str, default: u8) -> Result<u8> {
        match self.get_str(key) {
            Some(value) => value
                .trim()
                .parse::<u8>()
                .map_err(|_| invalid(format!("option \"{}\" expects a number, got \"{}\"", key, value))),
            None => Ok(default),
        }
    }

    /// Retrieves a flag option (`true`/`false`/`1`/`0`/`yes`/`no`)
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        match self.get_str(key) {
            Some(value) => match value.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(invalid(format!(
                    "option \"{}\" expects a boolean, got \"{}\"",
                    key, value
                ))),
            },
            None => Ok(default),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Options
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Options::new();
        for (key, value) in iter {
            options.insert(key, value);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let options = Options::new()
            .with("decimal_places", 3)
            .with("compact", "yes");
        assert_eq!(options.get_u8("decimal_places", 2).unwrap(), 3);
        assert_eq!(options.get_u8("missing", 2).unwrap(), 2);
        assert!(options.get_bool("compact", false).unwrap());
        assert!(!options.get_bool("missing", false).unwrap());
    }

    #[test]
    fn test_malformed_values() {
        let options: Options = [("decimal_places", "many"), ("compact", "maybe")]
            .into_iter()
            .collect();
        assert!(options.get_u8("decimal_places", 2).is_err());
        assert!(options.get_bool("compact", false).is_err());
    }
}
