//! Layer image discovery for anigen.
//!
//! Each layer (base, face, hair) is resolved once at startup by trying an
//! ordered list of sources:
//!
//! 1. numbered files in the bundled asset directory,
//! 2. numbered files in the patch folder, if one exists,
//! 3. for the base layer only, the smaller fallback sequence,
//! 4. a transparent placeholder sized like the first base image.
//!
//! Loading never fails; the worst case is a set holding one placeholder.
//!
//! # Example
//!
//! ```ignore
//! use anigen::assets::{AssetLibrary, LoadOptions};
//!
//! let library = AssetLibrary::load(&LoadOptions::default());
//! println!("{} base variants", library.layer_count(Layer::Base));
//! ```

mod manifest;
mod sequence;
mod source;

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::info;

use crate::types::{Layer, LayerOrigin, LayerSet};

pub use manifest::{Manifest, MANIFEST_FILENAME};
pub use sequence::{resolve_sequence, sequence_file_name, GapPolicy, SequenceItem};
pub use source::{find_patch_folder, AssetSource, DirSource, MemorySource, Probe, PATCH_FOLDER_NAME};

/// Options for resolving layer images.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Bundled asset directory.
    pub bundled_dir: PathBuf,
    /// Directory the patch folder is looked up from.
    pub working_dir: PathBuf,
    /// Patch folder name.
    pub patch_folder: String,
    /// File extension of numbered variants.
    pub extension: String,
    /// Highest variant number probed per layer.
    pub max_variants: u32,
    /// Prefix of the last-resort base sequence.
    pub fallback_prefix: String,
    /// Highest number probed in the fallback sequence.
    pub fallback_max: u32,
    /// Placeholder size used when no base image exists.
    pub placeholder_size: (u32, u32),
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from_manifest(&Manifest::default(), Path::new("."))
    }
}

impl LoadOptions {
    /// Build options from a manifest, resolving relative paths against `root`.
    pub fn from_manifest(manifest: &Manifest, root: &Path) -> Self {
        let bundled_dir = if manifest.assets.is_absolute() {
            manifest.assets.clone()
        } else {
            root.join(&manifest.assets)
        };

        Self {
            bundled_dir,
            working_dir: root.to_path_buf(),
            patch_folder: manifest.patch_folder.clone(),
            extension: manifest.extension.clone(),
            max_variants: manifest.max_variants,
            fallback_prefix: manifest.fallback_prefix.clone(),
            fallback_max: manifest.fallback_max,
            placeholder_size: (512, 512),
        }
    }
}

/// The three resolved layer sets of a session.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    base: LayerSet,
    face: LayerSet,
    hair: LayerSet,
}

impl AssetLibrary {
    /// Resolve all layers from the filesystem.
    pub fn load(options: &LoadOptions) -> Self {
        let bundled = DirSource::new(&options.bundled_dir);
        let patch = find_patch_folder(&options.working_dir, &options.patch_folder).map(DirSource::new);

        match &patch {
            Some(source) => info!(path = %source.location().display(), "using patch folder"),
            None => info!(name = %options.patch_folder, "no patch folder found"),
        }

        Self::load_from(&bundled, patch.as_ref().map(|s| s as &dyn AssetSource), options)
    }

    /// Resolve all layers from the given sources.
    pub fn load_from(
        bundled: &dyn AssetSource,
        patch: Option<&dyn AssetSource>,
        options: &LoadOptions,
    ) -> Self {
        let base = resolve_layer(Layer::Base, bundled, patch, options)
            .or_else(|| resolve_fallback(bundled, options))
            .unwrap_or_else(|| {
                let (w, h) = options.placeholder_size;
                info!(width = w, height = h, "no base images found, using placeholder");
                LayerSet::placeholder(Layer::Base, w, h)
            });

        let (w, h) = base.first().dimensions();
        let placeholder = |layer: Layer| {
            info!(%layer, width = w, height = h, "no images found, using placeholder");
            LayerSet::placeholder(layer, w, h)
        };

        let face = resolve_layer(Layer::Face, bundled, patch, options)
            .unwrap_or_else(|| placeholder(Layer::Face));
        let hair = resolve_layer(Layer::Hair, bundled, patch, options)
            .unwrap_or_else(|| placeholder(Layer::Hair));

        Self { base, face, hair }
    }

    /// Number of variants of `layer`. Always at least 1.
    pub fn layer_count(&self, layer: Layer) -> usize {
        self.layer_set(layer).len()
    }

    /// Variant `index` of `layer`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. Callers wrap indices first.
    pub fn image_at(&self, layer: Layer, index: usize) -> &RgbaImage {
        &self.layer_set(layer).images()[index]
    }

    pub fn layer_set(&self, layer: Layer) -> &LayerSet {
        match layer {
            Layer::Base => &self.base,
            Layer::Face => &self.face,
            Layer::Hair => &self.hair,
        }
    }

    /// All sets in z-order.
    pub fn sets(&self) -> [&LayerSet; 3] {
        [&self.base, &self.face, &self.hair]
    }

    /// Consume the library, returning `(base, face, hair)`.
    pub fn into_sets(self) -> (LayerSet, LayerSet, LayerSet) {
        (self.base, self.face, self.hair)
    }
}

/// Resolve every layer from the filesystem in one pass.
pub fn load_all(options: &LoadOptions) -> (LayerSet, LayerSet, LayerSet) {
    AssetLibrary::load(options).into_sets()
}

/// Try the bundled source, then the patch folder.
fn resolve_layer(
    layer: Layer,
    bundled: &dyn AssetSource,
    patch: Option<&dyn AssetSource>,
    options: &LoadOptions,
) -> Option<LayerSet> {
    let bundled_items = resolve_sequence(
        bundled,
        layer.prefix(),
        &options.extension,
        options.max_variants,
        GapPolicy::StopAtFirstGap,
    );
    if let Some(set) = LayerSet::new(layer, images(bundled_items), LayerOrigin::Bundled) {
        return Some(set);
    }

    let patch = patch?;
    let patch_items = resolve_sequence(
        patch,
        layer.prefix(),
        &options.extension,
        options.max_variants,
        GapPolicy::SkipLeadingGap,
    );
    let origin = LayerOrigin::PatchFolder {
        path: patch.location().to_path_buf(),
    };
    LayerSet::new(layer, images(patch_items), origin)
}

fn resolve_fallback(bundled: &dyn AssetSource, options: &LoadOptions) -> Option<LayerSet> {
    let items = resolve_sequence(
        bundled,
        &options.fallback_prefix,
        &options.extension,
        options.fallback_max,
        GapPolicy::StopAtFirstGap,
    );
    LayerSet::new(Layer::Base, images(items), LayerOrigin::Fallback)
}

fn images(items: Vec<SequenceItem>) -> Vec<RgbaImage> {
    items.into_iter().map(|item| item.image).collect()
}
