use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use crate::error::{invalid, Error, Result};

pub const DEFAULT_INDENT: usize = 2;
pub const MAX_INDENT: usize = 8;

fn parse(input: &str) -> Result<Value> {
    if input.trim().is_empty() {
        return Err(invalid("no JSON to process"));
    }
    Ok(serde_json::from_str(input)?)
}

/// Pretty prints the JSON document using `indent` spaces. An indent of zero
/// produces the compact form.
pub fn format(input: &str, indent: usize) -> Result<String> {
    if indent > MAX_INDENT {
        return Err(invalid(format!(
            "indentation must be between 0 and {}, got {}",
            MAX_INDENT, indent
        )));
    }
    let value = parse(input)?;
    if indent == 0 {
        return Ok(serde_json::to_string(&value)?);
    }

    let spaces = " ".repeat(indent);
    let mut output = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut output, PrettyFormatter::with_indent(spaces.as_bytes()));
    value.serialize(&mut serializer)?;
    String::from_utf8(output).map_err(|e| Error::InvalidJson(e.to_string()))
}

pub fn minify(input: &str) -> Result<String> {
    format(input, 0)
}

/// Checks that the input is a well formed JSON document
pub fn validate(input: &str) -> Result<()> {
    parse(input).map(|_| ())
}

/// Converts a JSON document into CSV.
///
/// Accepted shapes:
/// * an array of objects: the header is the union of their keys in first seen order
/// * an array of arrays: rows are written as they are, without header
/// * a single object: one header line and one row
///
/// Nested arrays and objects are written as JSON text, `null` as an empty field.
///
/// # Examples
///
/// ```
/// use toolshed::json::json_to_csv;
///
/// let csv = json_to_csv(r#"[{"name":"Ada","age":36},{"name":"Alan"}]"#, b',').unwrap();
/// assert_eq!(csv, "name,age\nAda,36\nAlan,\n");
/// ```
pub fn json_to_csv(input: &str, delimiter: u8) -> Result<String> {
    let value = parse(input)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    match value {
        Value::Array(items) if items.iter().all(Value::is_object) => {
            let objects: Vec<&Map<String, Value>> = items.iter().filter_map(Value::as_object).collect();
            write_objects(&mut writer, &objects)?;
        }
        Value::Array(items) if items.iter().all(Value::is_array) => {
            for item in &items {
                if let Value::Array(fields) = item {
                    writer.write_record(fields.iter().map(field))?;
                }
            }
        }
        Value::Array(_) => {
            return Err(invalid("arrays must contain only objects or only arrays"));
        }
        Value::Object(object) => write_objects(&mut writer, &[&object])?,
        _ => return Err(invalid("expected a JSON array or object")),
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::CsvError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::CsvError(e.to_string()))
}

fn write_objects<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    objects: &[&Map<String, Value>],
) -> Result<()> {
    let mut headers: Vec<&str> = Vec::new();
    for object in objects {
        for key in object.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }
    if headers.is_empty() {
        return Ok(());
    }
    writer.write_record(&headers)?;
    for object in objects {
        writer.write_record(
            headers
                .iter()
                .map(|key| object.get(*key).map(field).unwrap_or_default()),
        )?;
    }
    Ok(())
}

fn field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

/// Parses a single character delimiter, accepting `\t` and `tab` for tabs
pub fn parse_delimiter(delimiter: &str) -> Result<u8> {
    match delimiter {
        "\\t" | "tab" => Ok(b'\t'),
        d if d.len() == 1 && d.is_ascii() => Ok(d.as_bytes()[0]),
        _ => Err(invalid(format!(
            "delimiter must be a single ASCII character, got \"{}\"",
            delimiter
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_minify() {
        let input = r#"{"b": 1, "a": [true, null]}"#;
        assert_eq!(
            format(input, 2).unwrap(),
            "{\n  \"b\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}"
        );
        assert_eq!(format(input, 4).unwrap().lines().nth(1).unwrap(), "    \"b\": 1,");
        assert_eq!(minify(input).unwrap(), r#"{"b":1,"a":[true,null]}"#);
        assert!(format(input, 9).is_err());
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(validate(""), Err(Error::ValidationError(_))));
        assert!(matches!(validate("{\"a\":"), Err(Error::InvalidJson(_))));
        assert!(validate("[1, 2, 3]").is_ok());
    }

    #[test]
    fn test_objects_to_csv() {
        let input = r#"[{"id":1,"tags":["x","y"]},{"id":2,"name":"semi;colon"}]"#;
        assert_eq!(
            json_to_csv(input, b';').unwrap(),
            "id;tags;name\n1;\"[\"\"x\"\",\"\"y\"\"]\";\n2;;\"semi;colon\"\n"
        );
    }

    #[test]
    fn test_arrays_and_single_object_to_csv() {
        assert_eq!(json_to_csv("[[1,2],[3,null]]", b',').unwrap(), "1,2\n3,\n");
        assert_eq!(
            json_to_csv(r#"{"a":"x","b":false}"#, b'\t').unwrap(),
            "a\tb\nx\tfalse\n"
        );
        assert!(matches!(json_to_csv("42", b','), Err(Error::ValidationError(_))));
        assert!(matches!(json_to_csv("[1, {}]", b','), Err(Error::ValidationError(_))));
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert!(parse_delimiter("::").is_err());
    }
}
