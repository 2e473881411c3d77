// SPDX-License-Identifier: MPL-2.0
//! Centralized path management for the configuration directory.
//!
//! Settings (`settings.toml`) and templates (`templates.toml`) both live in
//! the config directory.
//!
//! # Path Resolution Order
//!
//! 1. **CLI argument** (`--config-dir`) - set via [`init_cli_override`]
//! 2. **Environment variable** (`PHOTO_WATERMARK_CONFIG_DIR`)
//! 3. **Platform default** - via `dirs` crate

use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used for directory naming.
pub const APP_NAME: &str = "PhotoWatermark";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "PHOTO_WATERMARK_CONFIG_DIR";

/// Settings file name inside the config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Template store file name inside the config directory.
pub const TEMPLATES_FILE: &str = "templates.toml";

/// Global CLI override for config directory (set once at startup).
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Records the `--config-dir` CLI argument.
///
/// Only the first call has an effect; later calls are logged and ignored.
pub fn init_cli_override(config_dir: Option<PathBuf>) {
    if CLI_CONFIG_DIR.set(config_dir).is_err() {
        tracing::warn!("config dir override already initialized, ignoring");
    }
}

fn get_cli_config_dir() -> Option<PathBuf> {
    CLI_CONFIG_DIR.get().and_then(Clone::clone)
}

/// Returns the application config directory path.
///
/// Platform defaults:
/// - Linux: `~/.config/PhotoWatermark/`
/// - macOS: `~/Library/Application Support/PhotoWatermark/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\PhotoWatermark\`
///
/// Returns `None` if the config directory cannot be determined (rare edge case).
pub fn get_app_config_dir() -> Option<PathBuf> {
    // Priority 1: CLI argument
    if let Some(path) = get_cli_config_dir() {
        return Some(path);
    }

    // Priority 2: Environment variable
    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    // Priority 3: Platform default with app name
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Path of `settings.toml`, if a config directory can be determined.
pub fn settings_path() -> Option<PathBuf> {
    get_app_config_dir().map(|dir| dir.join(SETTINGS_FILE))
}

/// Path of `templates.toml`, if a config directory can be determined.
pub fn templates_path() -> Option<PathBuf> {
    get_app_config_dir().map(|dir| dir.join(TEMPLATES_FILE))
}
