//! anigen - Layered character portrait composer
//!
//! A library for resolving interchangeable portrait layers (base, face,
//! hair) from bundled and user-supplied image sets, and compositing a
//! selection of them into a preview frame or an exported PNG.

pub mod assets;
pub mod cli;
pub mod error;
pub mod output;
pub mod render;
pub mod session;
pub mod types;

pub use assets::{load_all, AssetLibrary, AssetSource, DirSource, GapPolicy, LoadOptions, Manifest, MemorySource, Probe};
pub use error::{AnigenError, Result};
pub use render::{write_png, Compositor, Interpolation, LayerStack, Placement};
pub use session::Session;
pub use types::{next_index, prev_index, Layer, LayerOrigin, LayerSet, Selection};
