// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user defaults to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use photo_watermark::config::{self, Config};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.watermark.font_size = 48;
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

use crate::app::paths;
use crate::domain::watermark::{
    parse_color, Anchor, FontSize, Opacity, PlacementSpec, RotationDegrees, WatermarkStyle,
    DEFAULT_FONT_FAMILIES,
};
use crate::error::Result;
use crate::media::{NamingRule, OutputFormat};
use defaults::{
    DEFAULT_EXPORT_PREFIX, DEFAULT_EXPORT_SUFFIX, DEFAULT_FONT_COLOR, DEFAULT_FONT_SIZE,
    DEFAULT_OPACITY_PERCENT, DEFAULT_POSITION, DEFAULT_ROTATION_DEGREES,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub watermark: WatermarkConfig,
    pub export: ExportConfig,
}

/// `[watermark]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    pub font_size: u32,
    pub font_color: String,
    pub opacity: i32,
    pub rotation: i32,
    pub position: String,
    pub font_families: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_color: DEFAULT_FONT_COLOR.to_string(),
            opacity: DEFAULT_OPACITY_PERCENT,
            rotation: DEFAULT_ROTATION_DEGREES,
            position: DEFAULT_POSITION.to_string(),
            font_families: DEFAULT_FONT_FAMILIES.iter().map(|f| (*f).to_string()).collect(),
            font_path: None,
        }
    }
}

impl WatermarkConfig {
    /// Builds the style (with empty text) described by this section.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::InvalidColorFormat`] for a malformed hex color.
    pub fn to_style(&self) -> Result<WatermarkStyle> {
        Ok(WatermarkStyle {
            text: String::new(),
            font_file: self.font_path.clone(),
            font_families: self.font_families.clone(),
            font_size: FontSize::new(self.font_size),
            color: parse_color(&self.font_color)?,
            opacity: Opacity::new(self.opacity),
            rotation: RotationDegrees::new(self.rotation),
        })
    }

    /// The configured anchor; unknown names fall back to bottom-right.
    #[must_use]
    pub fn placement(&self) -> PlacementSpec {
        PlacementSpec::Anchor(Anchor::from_name_or_default(&self.position))
    }
}

/// Naming rule selector as stored in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingMode {
    Keep,
    Prefix,
    #[default]
    Suffix,
}

/// `[export]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: OutputFormat,
    pub naming: NamingMode,
    pub prefix: String,
    pub suffix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            naming: NamingMode::default(),
            prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            suffix: DEFAULT_EXPORT_SUFFIX.to_string(),
        }
    }
}

impl ExportConfig {
    #[must_use]
    pub fn naming_rule(&self) -> NamingRule {
        match self.naming {
            NamingMode::Keep => NamingRule::KeepOriginal,
            NamingMode::Prefix => NamingRule::Prefix(self.prefix.clone()),
            NamingMode::Suffix => NamingRule::Suffix(self.suffix.clone()),
        }
    }
}

pub fn load() -> Result<Config> {
    if let Some(path) = paths::settings_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = paths::settings_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Reads settings from `path`; unparsable content yields the defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_else(|err| {
        tracing::warn!(file = %path.display(), error = %err, "invalid settings, using defaults");
        Config::default()
    }))
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::watermark::Rgb;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let mut config = Config::default();
        config.watermark.font_size = 48;
        config.watermark.font_color = "#336699".to_string();
        config.watermark.position = "topLeft".to_string();
        config.export.format = OutputFormat::Png;
        config.export.naming = NamingMode::Prefix;

        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[watermark]\nopacity = 40\n").expect("write");

        let loaded = load_from_path(&config_path).expect("load");
        assert_eq!(loaded.watermark.opacity, 40);
        assert_eq!(loaded.watermark.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(loaded.export, ExportConfig::default());
    }

    #[test]
    fn watermark_section_builds_style() {
        let section = WatermarkConfig {
            font_color: "white".into(),
            opacity: 150,
            rotation: 30,
            position: "nowhere".into(),
            ..WatermarkConfig::default()
        };
        let style = section.to_style().expect("style");
        assert_eq!(style.color, Rgb::WHITE);
        assert_eq!(style.opacity.value(), 100);
        assert_eq!(style.rotation.value(), 30);
        assert_eq!(section.placement(), PlacementSpec::Anchor(Anchor::BottomRight));
    }

    #[test]
    fn malformed_hex_color_is_rejected() {
        let section = WatermarkConfig {
            font_color: "#12".into(),
            ..WatermarkConfig::default()
        };
        assert!(section.to_style().is_err());
    }

    #[test]
    fn export_section_maps_to_naming_rule() {
        let mut export = ExportConfig::default();
        assert_eq!(export.naming_rule(), NamingRule::Suffix("_watermarked".into()));
        export.naming = NamingMode::Keep;
        assert_eq!(export.naming_rule(), NamingRule::KeepOriginal);
    }
}
