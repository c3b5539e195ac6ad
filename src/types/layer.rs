//! Portrait layers and their resolved image sets.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use image::RgbaImage;
use serde::Serialize;

use crate::error::{AnigenError, Result};

/// One category of interchangeable portrait artwork.
///
/// Variants are declared in draw order: base first, hair on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Base,
    Face,
    Hair,
}

impl Layer {
    /// All layers in z-order.
    pub const ALL: [Layer; 3] = [Layer::Base, Layer::Face, Layer::Hair];

    /// Filename prefix for numbered variants (`p1.png`, `face1.png`, ...).
    pub fn prefix(self) -> &'static str {
        match self {
            Layer::Base => "p",
            Layer::Face => "face",
            Layer::Hair => "hair",
        }
    }

    /// Lowercase name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Layer::Base => "base",
            Layer::Face => "face",
            Layer::Hair => "hair",
        }
    }

    /// Capitalised name used in labels.
    pub fn title(self) -> &'static str {
        match self {
            Layer::Base => "Base",
            Layer::Face => "Face",
            Layer::Hair => "Hair",
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layer {
    type Err = AnigenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" | "body" => Ok(Layer::Base),
            "face" => Ok(Layer::Face),
            "hair" => Ok(Layer::Hair),
            other => Err(AnigenError::Parse {
                message: format!("Unknown layer '{}'", other),
                help: Some("Expected one of: base, face, hair".to_string()),
            }),
        }
    }
}

/// Where a layer set's images came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LayerOrigin {
    /// Numbered files from the bundled asset directory.
    Bundled,
    /// Numbered files from the patch folder.
    PatchFolder { path: PathBuf },
    /// The smaller `girl{n}` base sequence.
    Fallback,
    /// A single synthesized transparent image.
    Placeholder,
}

impl fmt::Display for LayerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerOrigin::Bundled => write!(f, "bundled"),
            LayerOrigin::PatchFolder { path } => write!(f, "patch folder {}", path.display()),
            LayerOrigin::Fallback => write!(f, "fallback"),
            LayerOrigin::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// An ordered, non-empty set of variants for one layer.
#[derive(Debug, Clone)]
pub struct LayerSet {
    layer: Layer,
    images: Vec<RgbaImage>,
    origin: LayerOrigin,
}

impl LayerSet {
    /// Build a set from resolved images. Returns `None` when `images` is empty.
    pub fn new(layer: Layer, images: Vec<RgbaImage>, origin: LayerOrigin) -> Option<Self> {
        if images.is_empty() {
            return None;
        }
        Some(Self {
            layer,
            images,
            origin,
        })
    }

    /// A single fully transparent image of the given size.
    pub fn placeholder(layer: Layer, width: u32, height: u32) -> Self {
        Self {
            layer,
            images: vec![RgbaImage::new(width, height)],
            origin: LayerOrigin::Placeholder,
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn origin(&self) -> &LayerOrigin {
        &self.origin
    }

    /// Number of variants. Never zero.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// The first variant, used to size placeholders.
    pub fn first(&self) -> &RgbaImage {
        &self.images[0]
    }

    pub fn images(&self) -> &[RgbaImage] {
        &self.images
    }
}
