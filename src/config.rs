use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{network, number, password, uuid};
use crate::error::*;
use crate::generators::lorem::LoremUnit;
use crate::transforms::number::NumberStyle;

pub const DEFAULT_LOREM_COUNT: usize = 5;

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct MainConfig {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub files: Files,
}

/// Default values used when a command line option is not given
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Defaults {
    pub decimal_places: u8,
    pub number_style: NumberStyle,
    pub password_length: usize,
    pub uuid_count: usize,
    pub lorem_unit: LoremUnit,
    pub lorem_count: usize,
    pub json_indent: usize,
    pub csv_delimiter: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Network {
    pub timeout_secs: u64,
    pub retries: u32,
    pub joke_url: String,
    pub assistant_url: String,
    /// Name of the environment variable holding the assistant API key
    pub api_key_env: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Files {
    /// Where downloads are written, the current directory if not set.
    /// Supports `~` and environment variables.
    pub output_dir: Option<String>,
    /// Appends the current date to suggested file names
    pub date_stamp: bool,
}

impl Default for Defaults {
    fn default() -> Defaults {
        Defaults {
            decimal_places: number::DEFAULT_DECIMAL_PLACES,
            number_style: NumberStyle::Comma,
            password_length: password::DEFAULT_LENGTH,
            uuid_count: uuid::DEFAULT_COUNT,
            lorem_unit: LoremUnit::Paragraphs,
            lorem_count: DEFAULT_LOREM_COUNT,
            json_indent: crate::json::DEFAULT_INDENT,
            csv_delimiter: ",".to_string(),
        }
    }
}

impl Default for Network {
    fn default() -> Network {
        Network {
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            retries: network::DEFAULT_RETRIES,
            joke_url: network::JOKE_URL.to_string(),
            assistant_url: network::GENERATIVE_URL.to_string(),
            api_key_env: network::API_KEY_ENV.to_string(),
        }
    }
}

impl Network {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Files {
    /// Resolves the output directory expanding `~` and environment variables
    ///
    /// # Errors
    /// `InterpolationError` if a referenced variable is not defined
    pub fn output_dir(&self) -> Result<PathBuf> {
        let dir = match &self.output_dir {
            Some(dir) => dir,
            None => return Ok(PathBuf::from(".")),
        };
        shellexpand::full(dir)
            .map(|expanded| PathBuf::from(expanded.as_ref()))
            .map_err(|e| Error::InterpolationError {
                location: ConfigType::MAIN,
                cause: e.to_string(),
            })
    }
}

impl MainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the configuration from its TOML representation
    pub fn from_toml(data: &str, file: &str) -> Result<Self> {
        toml::from_str(data).map_err(|e| Error::SerdeTomlError {
            location: ConfigType::MAIN,
            file: file.to_string(),
            cause: e.to_string(),
        })
    }
}

pub fn parse(file_path: &Path) -> Result<String> {
    let mut config_content = String::new();
    File::open(file_path)?.read_to_string(&mut config_content)?;
    Ok(config_content)
}
