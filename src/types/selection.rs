//! Per-layer selection indices with wraparound.

use super::Layer;

/// Index after `index`, wrapping to 0 past the end.
pub fn next_index(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index % len + 1) % len
}

/// Index before `index`, wrapping to `len - 1` before the start.
pub fn prev_index(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index % len + len - 1) % len
}

/// Reduce an arbitrary index into `[0, len)`.
pub fn wrap_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index % len
    }
}

/// The currently selected variant of each layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    indices: [usize; 3],
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, layer: Layer) -> usize {
        self.indices[layer.slot()]
    }

    /// Set an index, wrapping it into `[0, len)`.
    pub fn set(&mut self, layer: Layer, index: usize, len: usize) {
        self.indices[layer.slot()] = wrap_index(index, len);
    }

    pub fn next(&mut self, layer: Layer, len: usize) {
        let slot = layer.slot();
        self.indices[slot] = next_index(self.indices[slot], len);
    }

    pub fn prev(&mut self, layer: Layer, len: usize) {
        let slot = layer.slot();
        self.indices[slot] = prev_index(self.indices[slot], len);
    }

    pub fn reset(&mut self) {
        self.indices = [0; 3];
    }
}
