//! Project manifest (anigen.yaml) parsing.
//!
//! The manifest configures where layer images are read from and the
//! defaults used for previews and exports. Every field is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnigenError, Result};
use crate::render::Interpolation;

use super::source::PATCH_FOLDER_NAME;

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "anigen.yaml";

/// Project manifest loaded from anigen.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Directory holding the bundled layer images.
    pub assets: PathBuf,

    /// Name of the patch folder searched next to the working directory.
    pub patch_folder: String,

    /// Image file extension for numbered variants.
    pub extension: String,

    /// Highest variant number probed per layer.
    pub max_variants: u32,

    /// Prefix of the last-resort base sequence.
    pub fallback_prefix: String,

    /// Highest variant number probed for the fallback sequence.
    pub fallback_max: u32,

    /// Preview and export width in pixels.
    pub width: u32,

    /// Preview and export height in pixels.
    pub height: u32,

    /// Clip to the inscribed circle.
    pub circle: bool,

    /// Resampling filter used when scaling layers.
    pub filter: Interpolation,

    /// Default export path.
    pub output: PathBuf,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            assets: PathBuf::from("assets"),
            patch_folder: PATCH_FOLDER_NAME.to_string(),
            extension: "png".to_string(),
            max_variants: 50,
            fallback_prefix: "girl".to_string(),
            fallback_max: 4,
            width: 420,
            height: 420,
            circle: true,
            filter: Interpolation::Bilinear,
            output: PathBuf::from("anigen.png"),
        }
    }
}

impl Manifest {
    /// Load manifest from an anigen.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AnigenError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load `anigen.yaml` from `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<(Self, bool)> {
        let path = dir.join(MANIFEST_FILENAME);
        if path.is_file() {
            Ok((Self::load(&path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| AnigenError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some(format!("Check {} syntax", MANIFEST_FILENAME)),
        })
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| AnigenError::Parse {
            message: format!("Failed to serialize manifest: {}", e),
            help: None,
        })
    }
}
