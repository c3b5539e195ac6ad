//! Rendering module for anigen.
//!
//! This module handles compositing layer stacks into frames and writing
//! them out as PNG.

mod compositor;
mod png;

pub use compositor::{apply_circle_clip, circle_bounds, Compositor, Interpolation, LayerStack, Placement};
pub use png::{encode_png, write_png};
