// SPDX-License-Identifier: MPL-2.0
//! Named watermark setting templates persisted to `templates.toml`.
//!
//! Every mutation is written to disk immediately. A missing file opens as an
//! empty store, and so does an unparsable one (with a warning), so a damaged
//! file never blocks the application.

use crate::app::paths;
use crate::config::defaults::{
    DEFAULT_FONT_COLOR, DEFAULT_FONT_SIZE, DEFAULT_OPACITY_PERCENT, DEFAULT_POSITION,
    DEFAULT_ROTATION_DEGREES,
};
use crate::domain::watermark::{
    parse_color, Anchor, FontSize, Opacity, PlacementSpec, RotationDegrees, WatermarkStyle,
};
use crate::error::{Error, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Template Settings
// =============================================================================

/// The watermark settings captured by a template.
///
/// Missing keys take the application defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    pub watermark_text: String,
    pub font_size: u32,
    pub font_color: String,
    /// Opacity percentage, 100 is fully opaque.
    pub transparency: i32,
    pub rotation: i32,
    pub position: String,
    /// Dragged top-left offset; takes precedence over `position` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_offset: Option<[i32; 2]>,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            watermark_text: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            font_color: DEFAULT_FONT_COLOR.to_string(),
            transparency: DEFAULT_OPACITY_PERCENT,
            rotation: DEFAULT_ROTATION_DEGREES,
            position: DEFAULT_POSITION.to_string(),
            manual_offset: None,
        }
    }
}

impl TemplateSettings {
    /// Captures the current style and placement.
    #[must_use]
    pub fn capture(style: &WatermarkStyle, placement: PlacementSpec) -> Self {
        let (position, manual_offset) = match placement {
            PlacementSpec::Anchor(anchor) => (anchor.name().to_string(), None),
            PlacementSpec::Manual { x, y } => (DEFAULT_POSITION.to_string(), Some([x, y])),
        };
        Self {
            watermark_text: style.text.clone(),
            font_size: style.font_size.value(),
            font_color: style.color.to_hex(),
            transparency: i32::from(style.opacity.value()),
            rotation: style.rotation.value(),
            position,
            manual_offset,
        }
    }

    /// Applies these settings on top of `base`, keeping its font candidates.
    ///
    /// Unknown position names fall back to bottom-right and unknown color
    /// names to black.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColorFormat`] for a malformed hex color.
    pub fn apply_to(&self, base: &WatermarkStyle) -> Result<(WatermarkStyle, PlacementSpec)> {
        let style = WatermarkStyle {
            text: self.watermark_text.clone(),
            font_size: FontSize::new(self.font_size),
            color: parse_color(&self.font_color)?,
            opacity: Opacity::new(self.transparency),
            rotation: RotationDegrees::new(self.rotation),
            ..base.clone()
        };
        Ok((style, self.placement()))
    }

    #[must_use]
    pub fn placement(&self) -> PlacementSpec {
        match self.manual_offset {
            Some([x, y]) => PlacementSpec::Manual { x, y },
            None => PlacementSpec::Anchor(Anchor::from_name_or_default(&self.position)),
        }
    }
}

// =============================================================================
// Stored Templates
// =============================================================================

/// A named template with its timestamps (RFC 3339, local time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub settings: TemplateSettings,
    pub created: String,
    pub last_used: String,
}

/// Template metadata without the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub name: String,
    pub created: String,
    pub last_used: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct TemplateFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    last_template: Option<String>,
    templates: BTreeMap<String, Template>,
}

/// The template store backed by one TOML file.
#[derive(Debug)]
pub struct TemplateStore {
    path: PathBuf,
    data: TemplateFile,
}

fn now() -> String {
    Local::now().to_rfc3339()
}

impl TemplateStore {
    /// Opens the store at `path`, starting empty if the file is missing or
    /// cannot be parsed.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!(file = %path.display(), error = %err, "invalid template file, starting empty");
                TemplateFile::default()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => TemplateFile::default(),
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "cannot read template file, starting empty");
                TemplateFile::default()
            }
        };
        Self { path, data }
    }

    /// Opens the store in the application config directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no config directory can be determined.
    pub fn open_default() -> Result<Self> {
        paths::templates_path()
            .map(Self::open)
            .ok_or_else(|| Error::Config("no config directory available".into()))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates or replaces `name` and marks it as the last template.
    ///
    /// A replaced template keeps its original creation time.
    pub fn save_template(&mut self, name: &str, settings: TemplateSettings) -> Result<()> {
        let name = validate_name(name)?;
        let now = now();
        let created = self
            .data
            .templates
            .get(name)
            .map_or_else(|| now.clone(), |existing| existing.created.clone());

        self.data.templates.insert(
            name.to_string(),
            Template {
                name: name.to_string(),
                settings,
                created,
                last_used: now,
            },
        );
        self.data.last_template = Some(name.to_string());
        self.persist()
    }

    /// Returns the settings of `name`, updating its last-used time.
    ///
    /// Names are matched after trimming surrounding whitespace, as when saving.
    ///
    /// Returns `Ok(None)` if no such template exists.
    pub fn load_template(&mut self, name: &str) -> Result<Option<TemplateSettings>> {
        let name = name.trim();
        let Some(template) = self.data.templates.get_mut(name) else {
            return Ok(None);
        };
        template.last_used = now();
        let settings = template.settings.clone();
        self.data.last_template = Some(name.to_string());
        self.persist()?;
        Ok(Some(settings))
    }

    /// Deletes `name`; returns whether it existed.
    pub fn delete_template(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if self.data.templates.remove(name).is_none() {
            return Ok(false);
        }
        if self.data.last_template.as_deref() == Some(name) {
            self.data.last_template = None;
        }
        self.persist()?;
        Ok(true)
    }

    /// Renames a template, keeping its settings and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if `old` does not exist or `new` is taken.
    pub fn rename_template(&mut self, old: &str, new: &str) -> Result<()> {
        let old = old.trim();
        let new = validate_name(new)?;
        if old == new {
            return Ok(());
        }
        if self.data.templates.contains_key(new) {
            return Err(Error::Template(format!("a template named {new:?} already exists")));
        }
        let mut template = self
            .data
            .templates
            .remove(old)
            .ok_or_else(|| Error::Template(format!("no template named {old:?}")))?;
        template.name = new.to_string();
        self.data.templates.insert(new.to_string(), template);
        if self.data.last_template.as_deref() == Some(old) {
            self.data.last_template = Some(new.to_string());
        }
        self.persist()
    }

    /// Template names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.data.templates.keys().cloned().collect()
    }

    #[must_use]
    pub fn info(&self, name: &str) -> Option<TemplateInfo> {
        self.data.templates.get(name.trim()).map(|t| TemplateInfo {
            name: t.name.clone(),
            created: t.created.clone(),
            last_used: t.last_used.clone(),
        })
    }

    /// Name of the most recently saved or loaded template.
    #[must_use]
    pub fn last_template(&self) -> Option<&str> {
        self.data.last_template.as_deref()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.data)?;
        fs::write(&self.path, content)?;
        tracing::debug!(file = %self.path.display(), count = self.data.templates.len(), "saved templates");
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Template("template name cannot be empty".into()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::watermark::Rgb;
    use tempfile::tempdir;

    fn settings(text: &str) -> TemplateSettings {
        TemplateSettings {
            watermark_text: text.to_string(),
            font_size: 36,
            font_color: "#FF8800".to_string(),
            transparency: 60,
            rotation: -15,
            position: "top".to_string(),
            manual_offset: None,
        }
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempdir().expect("temp dir");
        let store = TemplateStore::open(dir.path().join("templates.toml"));
        assert!(store.names().is_empty());
        assert_eq!(store.last_template(), None);
    }

    #[test]
    fn unparsable_file_opens_empty() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("templates.toml");
        fs::write(&path, "[[[ broken").expect("write");
        assert!(TemplateStore::open(&path).names().is_empty());
    }

    #[test]
    fn save_persists_immediately_and_reloads() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("templates.toml");

        let mut store = TemplateStore::open(&path);
        store.save_template("copyright", settings("© Me")).expect("save");
        store.save_template("draft", settings("DRAFT")).expect("save");

        let mut reopened = TemplateStore::open(&path);
        assert_eq!(reopened.names(), vec!["copyright", "draft"]);
        assert_eq!(reopened.last_template(), Some("draft"));
        assert_eq!(
            reopened.load_template("copyright").expect("load"),
            Some(settings("© Me"))
        );
        assert_eq!(reopened.last_template(), Some("copyright"));
    }

    #[test]
    fn resaving_keeps_creation_time() {
        let dir = tempdir().expect("temp dir");
        let mut store = TemplateStore::open(dir.path().join("templates.toml"));
        store.save_template("a", settings("1")).expect("save");
        let created = store.info("a").expect("info").created;

        store.save_template("a", settings("2")).expect("save again");
        let info = store.info("a").expect("info");
        assert_eq!(info.created, created);
        assert!(chrono::DateTime::parse_from_rfc3339(&info.last_used).is_ok());
    }

    #[test]
    fn loading_unknown_template_returns_none() {
        let dir = tempdir().expect("temp dir");
        let mut store = TemplateStore::open(dir.path().join("templates.toml"));
        assert_eq!(store.load_template("nope").expect("load"), None);
    }

    #[test]
    fn delete_clears_last_template() {
        let dir = tempdir().expect("temp dir");
        let mut store = TemplateStore::open(dir.path().join("templates.toml"));
        store.save_template("a", settings("x")).expect("save");

        assert!(store.delete_template("a").expect("delete"));
        assert!(!store.delete_template("a").expect("delete again"));
        assert_eq!(store.last_template(), None);
        assert!(store.info("a").is_none());
    }

    #[test]
    fn rename_moves_template_and_last_marker() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("templates.toml");
        let mut store = TemplateStore::open(&path);
        store.save_template("old", settings("x")).expect("save");
        store.save_template("other", settings("y")).expect("save");
        store.load_template("old").expect("load");

        store.rename_template("old", "new").expect("rename");
        assert_eq!(store.names(), vec!["new", "other"]);
        assert_eq!(store.last_template(), Some("new"));
        assert_eq!(store.info("new").expect("info").name, "new");

        assert!(matches!(
            store.rename_template("new", "other"),
            Err(Error::Template(_))
        ));
        assert!(matches!(
            store.rename_template("ghost", "spirit"),
            Err(Error::Template(_))
        ));
        assert_eq!(TemplateStore::open(&path).names(), vec!["new", "other"]);
    }

    #[test]
    fn blank_names_are_rejected() {
        let dir = tempdir().expect("temp dir");
        let mut store = TemplateStore::open(dir.path().join("templates.toml"));
        assert!(store.save_template("   ", settings("x")).is_err());
    }

    #[test]
    fn names_match_after_trimming() {
        let dir = tempdir().expect("temp dir");
        let mut store = TemplateStore::open(dir.path().join("templates.toml"));
        store.save_template(" evening ", settings("x")).expect("save");
        assert_eq!(store.names(), ["evening"]);

        assert_eq!(
            store.load_template("  evening").expect("load"),
            Some(settings("x"))
        );
        assert!(store.info("evening ").is_some());
        store.rename_template(" evening ", "night").expect("rename");
        assert!(store.delete_template(" night ").expect("delete"));
        assert!(store.names().is_empty());
    }

    #[test]
    fn settings_convert_to_style_and_back() {
        let base = WatermarkStyle::default();
        let (style, placement) = settings("hello").apply_to(&base).expect("apply");
        assert_eq!(style.text, "hello");
        assert_eq!(style.color, Rgb([0xFF, 0x88, 0x00]));
        assert_eq!(style.opacity.value(), 60);
        assert_eq!(style.rotation.value(), -15);
        assert_eq!(style.font_families, base.font_families);
        assert_eq!(placement, PlacementSpec::Anchor(Anchor::Top));

        assert_eq!(TemplateSettings::capture(&style, placement), settings("hello"));
    }

    #[test]
    fn manual_offset_round_trips() {
        let style = WatermarkStyle::new("m");
        let captured = TemplateSettings::capture(&style, PlacementSpec::Manual { x: 12, y: 34 });
        assert_eq!(captured.manual_offset, Some([12, 34]));
        assert_eq!(captured.placement(), PlacementSpec::Manual { x: 12, y: 34 });
    }

    #[test]
    fn lenient_conversion_rules() {
        let odd = TemplateSettings {
            font_color: "mauve".into(),
            position: "somewhere".into(),
            ..TemplateSettings::default()
        };
        let (style, placement) = odd.apply_to(&WatermarkStyle::default()).expect("apply");
        assert_eq!(style.color, Rgb::BLACK);
        assert_eq!(placement, PlacementSpec::Anchor(Anchor::BottomRight));

        let bad_hex = TemplateSettings {
            font_color: "#XYZ".into(),
            ..TemplateSettings::default()
        };
        assert!(bad_hex.apply_to(&WatermarkStyle::default()).is_err());
    }
}
