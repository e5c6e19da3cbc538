use serde::{Deserialize, Serialize};
use std::{fmt, fs::File, path::Path};

use crate::{film::FilmSettings, renderer::RenderSettings, scene::IndexSettings};

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(why) => write!(f, "Failed to read settings: {}", why),
            SettingsError::Yaml(why) => write!(f, "Failed to parse settings: {}", why),
            SettingsError::Invalid(why) => write!(f, "Invalid settings: {}", why),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(why) => Some(why),
            SettingsError::Yaml(why) => Some(why),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(why: std::io::Error) -> Self {
        SettingsError::Io(why)
    }
}

impl From<serde_yaml::Error> for SettingsError {
    fn from(why: serde_yaml::Error) -> Self {
        SettingsError::Yaml(why)
    }
}

/// Everything that configures a render, any missing field falls back to its default.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InitialSettings {
    pub film: FilmSettings,
    pub render: RenderSettings,
    pub index: IndexSettings,
}

impl InitialSettings {
    /// Parses and validates settings from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads and validates settings from the YAML file at `path`.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let file = File::open(path)?;
        let settings: Self = serde_yaml::from_reader(file)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_yaml(&self) -> Result<String, SettingsError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.film.validate()?;
        self.render.validate()?;
        if self.index.kd_tree.max_depth > crate::kdtree::MAX_DEPTH {
            return Err(SettingsError::Invalid(format!(
                "kd_tree.max_depth is larger than {}",
                crate::kdtree::MAX_DEPTH
            )));
        }
        Ok(())
    }
}
