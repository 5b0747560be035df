//! Application configuration, read from a JSON file at startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "MATRIX_CONFIG";
pub const CONFIG_FILE: &str = "matrix.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    /// Single-byte CSV field separator.
    pub csv_separator: char,
    pub export_width: u32,
    pub export_height: u32,
    /// Open exported PNGs with the system viewer.
    pub open_after_export: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: [1280.0, 800.0],
            min_window_size: [960.0, 600.0],
            csv_separator: ',',
            export_width: 1200,
            export_height: 900,
            open_after_export: false,
        }
    }
}

impl AppConfig {
    /// Config path from `MATRIX_CONFIG`, else `matrix.json` in the working directory.
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// Load the config, falling back to defaults when the file is missing or unusable.
    pub fn load() -> Self {
        let path = Self::path();
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e:#}; using default config");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        if !self.csv_separator.is_ascii() {
            anyhow::bail!("csv_separator must be a single ASCII character");
        }
        Ok(self)
    }

    /// The separator as the byte polars expects.
    pub fn separator_byte(&self) -> u8 {
        if self.csv_separator.is_ascii() {
            self.csv_separator as u8
        } else {
            b','
        }
    }

    pub fn export_size(&self) -> (u32, u32) {
        (self.export_width, self.export_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let file = write_config(r#"{ "csv_separator": ";", "export_width": 640 }"#);
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.separator_byte(), b';');
        assert_eq!(config.export_size(), (640, 900));
        assert_eq!(config.window_size, AppConfig::default().window_size);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_config("{ not json");
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn non_ascii_separator_is_rejected() {
        let file = write_config(r#"{ "csv_separator": "§" }"#);
        assert!(AppConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn defaults_round_trip_through_json() {
        let json = serde_json::to_string(&AppConfig::default()).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AppConfig::default());
    }
}
