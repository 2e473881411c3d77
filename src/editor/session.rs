// SPDX-License-Identifier: MPL-2.0
//! Live editing state behind the watermark editor window.
//!
//! The window owns widgets and events; this session owns everything else:
//! the source image, the current style and placement, the resolved font, and
//! the scale of the last preview so pointer drags map back to image pixels.

use super::export::{export_images, ExportRequest};
use crate::app::templates::TemplateSettings;
use crate::batch::{BatchResult, FileReport};
use crate::domain::watermark::{placement, Anchor, PlacementSpec, WatermarkStyle};
use crate::error::Result;
use crate::media;
use crate::watermark::{self, FontLibrary, TextBox, WatermarkFont};
use image_rs::imageops::{self, FilterType};
use image_rs::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};

/// An in-progress pointer drag.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    /// Pointer position at press time, in preview pixels.
    pointer: (f32, f32),
    /// Text box top-left at press time, in image pixels.
    origin: (i32, i32),
}

/// Editor state for one source image.
#[derive(Debug)]
pub struct EditorSession<'a> {
    fonts: &'a FontLibrary,
    source: Option<PathBuf>,
    image: DynamicImage,
    style: WatermarkStyle,
    placement: PlacementSpec,
    font: WatermarkFont,
    preview_scale: f32,
    drag: Option<Drag>,
}

impl<'a> EditorSession<'a> {
    /// Starts a session on an already decoded image.
    #[must_use]
    pub fn new(
        fonts: &'a FontLibrary,
        image: DynamicImage,
        style: WatermarkStyle,
        placement: PlacementSpec,
    ) -> Self {
        let font = resolve_font(fonts, &style);
        Self {
            fonts,
            source: None,
            image,
            style,
            placement,
            font,
            preview_scale: 1.0,
            drag: None,
        }
    }

    /// Decodes `path` and starts a session on it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::UnreadableImage`] if decoding fails.
    pub fn open(
        fonts: &'a FontLibrary,
        path: &Path,
        style: WatermarkStyle,
        placement: PlacementSpec,
    ) -> Result<Self> {
        let image = media::load_image(path)?;
        let mut session = Self::new(fonts, image, style, placement);
        session.source = Some(path.to_path_buf());
        Ok(session)
    }

    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    #[must_use]
    pub fn style(&self) -> &WatermarkStyle {
        &self.style
    }

    #[must_use]
    pub fn placement(&self) -> PlacementSpec {
        self.placement
    }

    #[must_use]
    pub fn font(&self) -> &WatermarkFont {
        &self.font
    }

    #[must_use]
    pub fn image_size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Replaces the style, resolving the font again only when the text or the
    /// font candidates changed.
    pub fn set_style(&mut self, style: WatermarkStyle) {
        let refont = style.text != self.style.text
            || style.font_file != self.style.font_file
            || style.font_families != self.style.font_families;
        self.style = style;
        if refont {
            self.font = resolve_font(self.fonts, &self.style);
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let style = self.style.with_text(text);
        self.set_style(style);
    }

    /// Switches to a named anchor, discarding any manual offset.
    pub fn select_anchor(&mut self, anchor: Anchor) {
        self.drag = None;
        self.placement = PlacementSpec::Anchor(anchor);
    }

    /// Where the text box currently sits, in image pixels.
    #[must_use]
    pub fn text_box(&self) -> TextBox {
        watermark::locate(self.image_size(), &self.style, self.placement, &self.font)
    }

    // =========================================================================
    // Dragging
    // =========================================================================

    /// Pointer pressed at `point` (preview pixels).
    pub fn begin_drag(&mut self, point: (f32, f32)) {
        let text_box = self.text_box();
        self.drag = Some(Drag {
            pointer: point,
            origin: (text_box.x, text_box.y),
        });
    }

    /// Pointer moved to `point` (preview pixels).
    ///
    /// Switches the placement to a manual offset, clamped into the image.
    /// Without a preceding [`begin_drag`](Self::begin_drag) this does nothing.
    pub fn drag_to(&mut self, point: (f32, f32)) {
        let Some(drag) = self.drag else {
            return;
        };
        let scale = if self.preview_scale > 0.0 {
            self.preview_scale
        } else {
            1.0
        };
        #[allow(clippy::cast_possible_truncation)]
        let delta = (
            ((point.0 - drag.pointer.0) / scale).round() as i32,
            ((point.1 - drag.pointer.1) / scale).round() as i32,
        );
        let raw = PlacementSpec::Manual {
            x: drag.origin.0.saturating_add(delta.0),
            y: drag.origin.1.saturating_add(delta.1),
        };
        let text_size = watermark::render::measure(&self.style, &self.font).size();
        let (x, y) = placement::resolve(self.image_size(), text_size, raw, 0);
        self.placement = PlacementSpec::Manual { x, y };
    }

    /// Pointer released.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Watermarks the source image at full resolution.
    #[must_use]
    pub fn render(&self) -> RgbaImage {
        watermark::apply(&self.image, &self.style, self.placement, &self.font)
    }

    /// Renders at full resolution, then shrinks to fit `max_w` × `max_h`.
    ///
    /// Never upscales. The applied scale is remembered for drag conversion.
    pub fn render_preview(&mut self, max_w: u32, max_h: u32) -> RgbaImage {
        let full = self.render();
        let (width, height) = full.dimensions();
        let scale = fit_scale((width, height), (max_w, max_h));
        self.preview_scale = scale;

        if scale >= 1.0 {
            return full;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let (new_w, new_h) = (
            ((width as f32 * scale).round() as u32).max(1),
            ((height as f32 * scale).round() as u32).max(1),
        );
        imageops::resize(&full, new_w, new_h, FilterType::Lanczos3)
    }

    /// Preview pixels per image pixel from the last preview.
    #[must_use]
    pub fn preview_scale(&self) -> f32 {
        self.preview_scale
    }

    // =========================================================================
    // Templates
    // =========================================================================

    /// Replaces style and placement with a template's settings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::InvalidColorFormat`] for a malformed hex
    /// color; the session is left unchanged in that case.
    pub fn apply_template(&mut self, settings: &TemplateSettings) -> Result<()> {
        let (style, placement) = settings.apply_to(&self.style)?;
        self.set_style(style);
        self.drag = None;
        self.placement = placement;
        Ok(())
    }

    /// Snapshot of the current settings for saving as a template.
    #[must_use]
    pub fn capture_template(&self) -> TemplateSettings {
        TemplateSettings::capture(&self.style, self.placement)
    }

    /// Exports `files` with this session's style and placement, reporting
    /// each finished file to `on_file`.
    ///
    /// # Errors
    ///
    /// See [`export_images`].
    pub fn export(
        &self,
        files: &[PathBuf],
        request: &ExportRequest,
        on_file: impl FnMut(&FileReport),
    ) -> Result<BatchResult> {
        export_images(files, &self.style, self.placement, request, self.fonts, on_file)
    }
}

fn resolve_font(fonts: &FontLibrary, style: &WatermarkStyle) -> WatermarkFont {
    fonts.resolve(style.font_file.as_deref(), &style.font_families, &style.text)
}

#[allow(clippy::cast_precision_loss)]
fn fit_scale(size: (u32, u32), bounds: (u32, u32)) -> f32 {
    if size.0 == 0 || size.1 == 0 {
        return 1.0;
    }
    let sx = bounds.0 as f32 / size.0 as f32;
    let sy = bounds.1 as f32 / size.1 as f32;
    sx.min(sy).min(1.0)
}
