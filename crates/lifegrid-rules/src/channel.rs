//! Named per-cell auxiliary data.

use indexmap::IndexMap;
use lifegrid_core::{resize_preserving, Dims, RuleError};

/// Name → dense `f32` array, one value per grid cell.
///
/// Every channel always has exactly `dims.cell_count()` entries; the
/// registry resizes and clears all channels in lockstep with the grid.
/// Name uniqueness is the only identity; iteration order is creation
/// order but carries no meaning.
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    dims: Dims,
    channels: IndexMap<String, Vec<f32>>,
}

impl ChannelRegistry {
    /// Create an empty registry for a grid of `dims`.
    pub fn new(dims: Dims) -> Self {
        Self {
            dims,
            channels: IndexMap::new(),
        }
    }

    /// Dimensions every channel is sized to.
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Return the channel `name`, creating it zero-filled if absent.
    ///
    /// Idempotent: an existing channel is returned untouched.
    pub fn ensure(&mut self, name: &str) -> &mut [f32] {
        let cells = self.dims.cell_count();
        self.channels
            .entry(name.to_string())
            .or_insert_with(|| vec![0.0; cells])
    }

    /// Read-only access to a channel.
    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.channels.get(name).map(Vec::as_slice)
    }

    /// Mutable access to a channel.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut [f32]> {
        self.channels.get_mut(name).map(Vec::as_mut_slice)
    }

    /// Like [`get`](Self::get), but a missing channel is a [`RuleError`].
    pub fn require(&self, name: &str) -> Result<&[f32], RuleError> {
        self.get(name).ok_or_else(|| RuleError::MissingChannel {
            name: name.to_string(),
        })
    }

    /// Like [`get_mut`](Self::get_mut), but a missing channel is a [`RuleError`].
    pub fn require_mut(&mut self, name: &str) -> Result<&mut [f32], RuleError> {
        self.channels
            .get_mut(name)
            .map(Vec::as_mut_slice)
            .ok_or_else(|| RuleError::MissingChannel {
                name: name.to_string(),
            })
    }

    /// Whether a channel named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Destroy a channel. Returns `false` if it did not exist.
    pub fn remove(&mut self, name: &str) -> bool {
        self.channels.shift_remove(name).is_some()
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channels exist.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channel names in creation order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.channels.keys().map(String::as_str)
    }

    /// Zero every value of every channel, keeping the channels themselves.
    pub fn clear(&mut self) {
        for values in self.channels.values_mut() {
            values.fill(0.0);
        }
    }

    /// Resize every channel to `dims`, preserving the overlapping
    /// top-left sub-rectangle and zero-filling new cells.
    pub fn resize(&mut self, dims: Dims) {
        let from = self.dims;
        for values in self.channels.values_mut() {
            *values = resize_preserving(values, from, dims);
        }
        self.dims = dims;
    }
}
