use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use nu_ansi_term::Color;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::debug;
use crate::error::{invalid, ConfigType, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    #[strum(serialize = "light")]
    Light,
    #[strum(serialize = "dark")]
    Dark,
}

/// Colors used to render notices for a given theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub success: Color,
    pub error: Color,
    pub info: Color,
}

impl Theme {
    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Light => Palette {
                success: Color::Green,
                error: Color::Red,
                info: Color::Blue,
            },
            Theme::Dark => Palette {
                success: Color::LightGreen,
                error: Color::LightRed,
                info: Color::LightCyan,
            },
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(invalid(format!("unknown theme \"{}\"", s))),
        }
    }
}

/// User preferences persisted between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

pub trait PreferenceStore {
    fn load(&self) -> Result<Preferences>;
    fn save(&self, preferences: &Preferences) -> Result<()>;
}

/// Preferences stored as a TOML file. A missing file yields the defaults.
#[derive(Debug, Clone)]
pub struct TomlPreferenceStore {
    path: PathBuf,
}

impl TomlPreferenceStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn load(&self) -> Result<Preferences> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No preferences found at {}, using defaults", self.path.display());
                return Ok(Preferences::default());
            }
            Err(e) => {
                return Err(Error::ConfigReadError {
                    file: self.path.to_string_lossy().to_string(),
                    cause: e.to_string(),
                })
            }
        };
        toml::from_str(&data).map_err(|e| Error::SerdeTomlError {
            location: ConfigType::PREFERENCES,
            file: self.path.to_string_lossy().to_string(),
            cause: e.to_string(),
        })
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        let data = toml::to_string(preferences).map_err(|e| Error::ConfigError(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    preferences: RefCell<Preferences>,
}

impl MemoryPreferenceStore {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences: RefCell::new(preferences),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences> {
        Ok(*self.preferences.borrow())
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        *self.preferences.borrow_mut() = *preferences;
        Ok(())
    }
}

/// Owns the loaded preferences and the store they are saved to
pub struct AppContext {
    preferences: Preferences,
    store: Box<dyn PreferenceStore>,
}

impl AppContext {
    pub fn load(store: Box<dyn PreferenceStore>) -> Result<Self> {
        let preferences = store.load()?;
        Ok(Self { preferences, store })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn theme(&self) -> Theme {
        self.preferences.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.preferences.theme = theme;
        self.store.save(&self.preferences)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }
}
