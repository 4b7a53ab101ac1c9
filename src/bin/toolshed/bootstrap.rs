use chrono::prelude::*;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

pub use toolshed::{
    config::{parse as config_parse, MainConfig},
    error::*,
};

use crate::directories::{ProjectDirs, PROJECT_DIRS};

static DEFAULT_CONF: &str = "# File automatically generated on ${date}\n\
                            [defaults]\n\
                            decimal_places  = 2\n\
                            number_style    = \"comma\"\n\
                            password_length = 16\n\
                            uuid_count      = 5\n\
                            lorem_unit      = \"paragraphs\"\n\
                            lorem_count     = 5\n\
                            json_indent     = 2\n\
                            csv_delimiter   = \",\"\n\n\
                            [network]\n\
                            timeout_secs    = ${timeout}\n\
                            retries         = ${retries}\n\
                            api_key_env     = \"${api_key_env}\"\n\n\
                            [files]\n\
                            # output_dir    = \"~/Downloads\"\n\
                            date_stamp      = false\n";

const DEFAULT_CONF_FILE: &str = "toolshed.toml";
const PREFERENCES_FILE: &str = "preferences.toml";
const TODOS_FILE: &str = "todos.json";
#[cfg(feature = "fetcher")]
const FAVORITES_FILE: &str = "favorite-jokes.json";

#[derive(Debug)]
pub struct BootStrap {
    config: MainConfig,
}

impl BootStrap {
    pub fn new() -> Result<Self> {
        Ok(BootStrap {
            config: parse_main_config()?,
        })
    }

    pub fn get_config(&self) -> &MainConfig {
        &self.config
    }

    /// Directory downloads are written to, from `files.output_dir` with `~`
    /// and environment variables expanded
    pub fn output_dir(&self) -> Result<PathBuf> {
        self.config.files.output_dir()
    }

    pub fn preferences_file(&self) -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join(PREFERENCES_FILE))
    }

    pub fn todos_file(&self) -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().join(TODOS_FILE))
    }

    #[cfg(feature = "fetcher")]
    pub fn favorites_file(&self) -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().join(FAVORITES_FILE))
    }
}

fn project_dirs() -> Result<&'static ProjectDirs> {
    PROJECT_DIRS
        .as_ref()
        .ok_or_else(|| Error::ConfigError("could not get the home directory".to_string()))
}

/// Creates the default main configuration file in the config directory
///
/// # Arguments
/// * `config_file` - The path to the configuration file
///
/// # Returns
/// A `Result` containing the configuration data as a `String`
///
/// # Errors
/// * `ConfigError` - If the configuration file cannot be created
/// * `IoError` - If an I/O error occurs while creating the configuration file
fn create_default_config(config_file: &Path) -> Result<String> {
    let parent_dir = config_file
        .parent()
        .ok_or_else(|| Error::ConfigError(format!("unable to create {}", config_file.display())))?;
    std::fs::create_dir_all(parent_dir)?;
    let current_date: DateTime<Local> = Local::now();
    let network = toolshed::config::Network::default();
    let config_data = DEFAULT_CONF
        .replacen("${date}", &current_date.to_string(), 1)
        .replacen("${timeout}", &network.timeout_secs.to_string(), 1)
        .replacen("${retries}", &network.retries.to_string(), 1)
        .replacen("${api_key_env}", &network.api_key_env, 1);

    File::create(config_file)?.write_all(config_data.as_bytes())?;
    Ok(config_data)
}

/// Processes the main configuration file retrieving the associated `MainConfig` structure
///
/// If the file does not exist, a default configuration file is created.
///
/// # Errors
///
/// This function returns an error if the configuration file cannot be read or parsed.
pub fn parse_main_config() -> Result<MainConfig> {
    let conf_file = &project_dirs()?.config_dir().join(DEFAULT_CONF_FILE);
    let toml_data = match config_parse(conf_file) {
        Ok(data) => data,
        Err(Error::Io(e)) if e.kind() == ::std::io::ErrorKind::NotFound => {
            create_default_config(conf_file)?
        }
        Err(Error::Io(e)) => {
            return Err(Error::ConfigReadError {
                file: String::from(DEFAULT_CONF_FILE),
                cause: e.to_string(),
            });
        }
        Err(e) => return Err(e),
    };

    MainConfig::from_toml(&toml_data, DEFAULT_CONF_FILE)
}
