use std::io::Write;
use strum_macros::Display;
use thiserror::Error;

#[derive(Debug, Display)]
pub enum ConfigType {
    #[strum(serialize = "Main config")]
    MAIN,
    #[strum(serialize = "Preferences")]
    PREFERENCES,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("error processing args. Cause : {0}")]
    ArgsProcessingError(String),
    #[error("invalid input : {0}")]
    ValidationError(String),
    #[error("unknown operation \"{0}\"")]
    UnknownOperation(String),
    #[error("operation \"{0}\" is already registered")]
    DuplicateOperation(String),
    #[error("\"{0}\" is not a valid number")]
    NotANumber(String),
    #[error("no characters left to generate a password from")]
    EmptyCharset,
    #[error("namespace and name are required for v5 UUIDs")]
    MissingNamespace,
    #[error("unable to read file {file:?}. Cause : {cause}")]
    FileReadError { file: String, cause: String },
    #[error("file {file:?} is too large ({size} bytes, max {limit} bytes)")]
    FileTooLarge { file: String, size: u64, limit: u64 },
    #[error("request to {url} failed. Cause : {cause}")]
    NetworkError { url: String, cause: String },
    #[error("no clipboard available. Cause : {0}")]
    ClipboardUnavailable(String),
    #[error("invalid JSON : {0}")]
    InvalidJson(String),
    #[cfg(feature = "fetcher")]
    #[error("HTTP client error: {0}")]
    ClientHttpError(::isahc::http::Error),
    #[error("configuration error : {0}")]
    ConfigError(String),
    #[error("unable to read configuration file {file:?}. Cause : {cause}")]
    ConfigReadError { file: String, cause: String },
    #[error("Error executing command. Cause : {0}")]
    CommandError(String),
    #[error(transparent)]
    Fmt(#[from] ::std::fmt::Error),
    #[error("unable to parse {location} file {file:?}. Cause : {cause}")]
    SerdeTomlError {
        location: ConfigType,
        file: String,
        cause: String,
    },
    #[error("CSV error: {0}")]
    CsvError(String),
    #[cfg(feature = "imaging")]
    #[error(transparent)]
    ImageError(#[from] ::image::ImageError),
    #[error(transparent)]
    Io(#[from] ::std::io::Error),
    #[error("unable to interpolate variable. Cause : {cause}")]
    InterpolationError { location: ConfigType, cause: String },
    #[error("{0}")]
    Msg(String),
}

#[cfg(feature = "fetcher")]
impl From<isahc::http::Error> for Error {
    fn from(error: isahc::http::Error) -> Self {
        Error::ClientHttpError(error)
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::CsvError(error.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::InvalidJson(error.to_string())
    }
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error::Msg(s.to_owned())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Msg(s)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Builds a validation error from anything printable
pub fn invalid<S: Into<String>>(message: S) -> Error {
    Error::ValidationError(message.into())
}

pub fn default_error_handler(error: &Error, output: &mut dyn Write) {
    use nu_ansi_term::Color::Red;

    match error {
        Error::Io(io_error) if io_error.kind() == ::std::io::ErrorKind::BrokenPipe => {
            ::std::process::exit(0);
        }
        Error::ConfigReadError { .. }
        | Error::ConfigError(_)
        | Error::SerdeTomlError { .. }
        | Error::InterpolationError { .. } => {
            writeln!(output, "{}: {}", Red.paint("[config error]"), error).ok();
        }
        Error::ValidationError(_)
        | Error::NotANumber(_)
        | Error::EmptyCharset
        | Error::MissingNamespace
        | Error::InvalidJson(_) => {
            writeln!(output, "{}: {}", Red.paint("[input error]"), error).ok();
        }
        Error::UnknownOperation(_) | Error::DuplicateOperation(_) => {
            writeln!(output, "{}: {}", Red.paint("[operation error]"), error).ok();
        }
        Error::FileReadError { .. } | Error::FileTooLarge { .. } => {
            writeln!(output, "{}: {}", Red.paint("[file error]"), error).ok();
        }
        Error::NetworkError { .. } => {
            writeln!(output, "{}: {}", Red.paint("[network error]"), error).ok();
        }
        _ => {
            writeln!(output, "{}: {}", Red.paint("[toolshed error]"), error).ok();
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::UnknownOperation("shout".to_string()).to_string(),
            "unknown operation \"shout\""
        );
        assert_eq!(
            Error::FileTooLarge {
                file: "a.txt".to_string(),
                size: 200,
                limit: 100
            }
            .to_string(),
            "file \"a.txt\" is too large (200 bytes, max 100 bytes)"
        );
    }

    #[test]
    fn test_default_error_handler_categories() {
        let mut output = Vec::new();
        default_error_handler(&Error::NotANumber("abc".to_string()), &mut output);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("[input error]"));
        assert!(text.contains("\"abc\" is not a valid number"));

        let mut output = Vec::new();
        default_error_handler(
            &Error::NetworkError {
                url: "http://localhost".to_string(),
                cause: "timeout".to_string(),
            },
            &mut output,
        );
        assert!(String::from_utf8(output).unwrap().contains("[network error]"));
    }
}
