//! Asset sources: places numbered layer images can be read from.
//!
//! A source answers one question per file name: is there an image here,
//! and does it decode? Missing and undecodable entries are distinct so the
//! sequence scanner can stop on one and skip the other.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::Result;
use crate::render::encode_png;

/// Directory name searched for user-supplied layer images.
pub const PATCH_FOLDER_NAME: &str = "character creator patcher";

/// Outcome of looking up one file in a source.
#[derive(Debug)]
pub enum Probe {
    /// No entry with that name.
    Missing,
    /// An entry exists but is not a readable image.
    Undecodable(String),
    /// A decoded RGBA image.
    Image(RgbaImage),
}

/// A read-only provider of named images.
pub trait AssetSource {
    /// Where this source reads from, for diagnostics and `list` output.
    fn location(&self) -> &Path;

    /// Look up and decode a single file.
    fn probe(&self, file_name: &str) -> Probe;
}

/// Images stored as files in a directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirSource {
    fn location(&self) -> &Path {
        &self.root
    }

    fn probe(&self, file_name: &str) -> Probe {
        let path = self.root.join(file_name);
        if !path.exists() {
            return Probe::Missing;
        }
        if !path.is_file() {
            return Probe::Undecodable(format!("{} is not a file", path.display()));
        }

        match image::open(&path) {
            Ok(img) => Probe::Image(img.to_rgba8()),
            Err(e) => Probe::Undecodable(e.to_string()),
        }
    }
}

/// Encoded images held in memory, keyed by file name.
#[derive(Debug, Clone)]
pub struct MemorySource {
    label: PathBuf,
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new(label: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            entries: HashMap::new(),
        }
    }

    /// Add raw encoded bytes under `name`. The bytes are only decoded on probe.
    pub fn insert_bytes(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(name.into(), bytes);
    }

    /// Add an image, PNG-encoded.
    pub fn insert_image(&mut self, name: impl Into<String>, image: &RgbaImage) -> Result<()> {
        let bytes = encode_png(image)?;
        self.insert_bytes(name, bytes);
        Ok(())
    }
}

impl AssetSource for MemorySource {
    fn location(&self) -> &Path {
        &self.label
    }

    fn probe(&self, file_name: &str) -> Probe {
        let Some(bytes) = self.entries.get(file_name) else {
            return Probe::Missing;
        };

        match image::load_from_memory(bytes) {
            Ok(img) => Probe::Image(img.to_rgba8()),
            Err(e) => Probe::Undecodable(e.to_string()),
        }
    }
}

/// Locate the patch folder for a working directory.
///
/// Checks `<working_dir>/../<name>` first, then `<working_dir>/<name>`.
/// Returns the first one that is an existing directory.
pub fn find_patch_folder(working_dir: &Path, name: &str) -> Option<PathBuf> {
    if let Some(parent) = working_dir.parent() {
        let sibling = parent.join(name);
        if sibling.is_dir() {
            return Some(sibling);
        }
    }

    let local = working_dir.join(name);
    if local.is_dir() {
        return Some(local);
    }

    None
}
