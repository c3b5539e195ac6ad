//! Core domain types for anigen.
//!
//! - `Layer` - the three portrait layers, in draw order
//! - `LayerSet` - resolved, non-empty variants of one layer
//! - `Selection` - the chosen variant of each layer

mod layer;
mod selection;

pub use layer::{Layer, LayerOrigin, LayerSet};
pub use selection::{next_index, prev_index, wrap_index, Selection};
