// Application settings
// Loaded from <config_dir>/xlsel/settings.toml, or the file named by --config.
// Every value is a prompt default; nothing here skips a prompt.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "XLSEL_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    /// Encoding labels tried in order when decoding CSV input.
    /// Empty means the built-in list.
    pub encodings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeSettings {
    pub sort_inputs: bool,
    pub drop_blank_rows: bool,
    pub output_name: String,
    pub sheet_name: String,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            sort_inputs: true,
            drop_blank_rows: true,
            output_name: "merged_output".to_string(),
            sheet_name: "MergedData".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitSettings {
    pub prefix: String,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self { prefix: "output".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Sheet name for XLSX outputs other than merge.
    pub sheet_name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { sheet_name: "Sheet1".to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub csv: CsvSettings,
    pub merge: MergeSettings,
    pub split: SplitSettings,
    pub output: OutputSettings,
}

impl Settings {
    /// Default settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("xlsel")
            .join("settings.toml")
    }

    /// Load from `explicit` or the default path, falling back to defaults.
    /// The file is never created.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = explicit.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if !path.exists() {
            if explicit.is_some() {
                log::warn!("settings file {} not found, using defaults", path.display());
            } else {
                log::debug!("no settings file at {}", path.display());
            }
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_toml(&contents) {
                Ok(settings) => {
                    log::debug!("loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("error reading {}: {}; using default settings", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}
