//! Interactive portrait session.
//!
//! A `Session` owns the resolved layer sets, the current selection and the
//! circle-clip flag. Front ends (the `shell` command, or any windowed UI)
//! forward user events to it and blit the frames it renders.

use std::path::Path;

use image::RgbaImage;
use rand::Rng;
use tracing::debug;

use crate::assets::AssetLibrary;
use crate::error::Result;
use crate::render::{write_png, Compositor, LayerStack};
use crate::types::{Layer, Selection};

/// Suggested file name for exports.
pub const DEFAULT_EXPORT_NAME: &str = "anigen.png";

/// Default preview size in pixels.
pub const DEFAULT_PREVIEW_SIZE: (u32, u32) = (420, 420);

pub struct Session {
    library: AssetLibrary,
    selection: Selection,
    circle_clip: bool,
    compositor: Compositor,
}

impl Session {
    /// Start a session with every layer on its first variant and circle clip on.
    pub fn new(library: AssetLibrary, compositor: Compositor) -> Self {
        Self {
            library,
            selection: Selection::new(),
            circle_clip: true,
            compositor,
        }
    }

    pub fn with_circle_clip(mut self, enabled: bool) -> Self {
        self.circle_clip = enabled;
        self
    }

    pub fn library(&self) -> &AssetLibrary {
        &self.library
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn on_prev(&mut self, layer: Layer) {
        self.selection.prev(layer, self.library.layer_count(layer));
    }

    pub fn on_next(&mut self, layer: Layer) {
        self.selection.next(layer, self.library.layer_count(layer));
    }

    pub fn on_randomize(&mut self) {
        self.randomize_with(&mut rand::rng());
    }

    /// Pick a uniformly random variant of every layer.
    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R) {
        for layer in Layer::ALL {
            let len = self.library.layer_count(layer);
            let index = rng.random_range(0..len);
            self.selection.set(layer, index, len);
        }
        debug!(selection = ?self.selection, "randomized");
    }

    pub fn on_reset(&mut self) {
        self.selection.reset();
    }

    pub fn on_toggle_circle_clip(&mut self, enabled: bool) {
        self.circle_clip = enabled;
    }

    pub fn circle_clip(&self) -> bool {
        self.circle_clip
    }

    /// Select a variant directly; out-of-range indices wrap.
    pub fn select(&mut self, layer: Layer, index: usize) {
        self.selection.set(layer, index, self.library.layer_count(layer));
    }

    pub fn current_selection(&self, layer: Layer) -> usize {
        self.selection.get(layer)
    }

    /// Position label, e.g. `"Face 2 / 5"`.
    pub fn label(&self, layer: Layer) -> String {
        format!(
            "{} {} / {}",
            layer.title(),
            self.current_selection(layer) + 1,
            self.library.layer_count(layer)
        )
    }

    /// The currently selected image of every layer.
    pub fn stack(&self) -> LayerStack<'_> {
        let library = &self.library;
        let selection = self.selection;
        let image = move |layer: Layer| Some(library.image_at(layer, selection.get(layer)));
        LayerStack::new(image(Layer::Base), image(Layer::Face), image(Layer::Hair))
    }

    /// Render the preview frame for a panel of the given size.
    pub fn render_preview(&self, width: u32, height: u32) -> RgbaImage {
        self.compositor
            .render(width, height, &self.stack(), self.circle_clip)
    }

    /// Render the frame an export at this panel size would write.
    pub fn export_frame(&self, width: u32, height: u32) -> RgbaImage {
        self.compositor
            .export_frame(width, height, &self.stack(), self.circle_clip)
    }

    /// Write the current portrait to `path` as PNG. Returns the written size.
    pub fn export(&self, path: &Path, width: u32, height: u32) -> Result<(u32, u32)> {
        let frame = self.export_frame(width, height);
        write_png(&frame, path)?;
        Ok(frame.dimensions())
    }
}
