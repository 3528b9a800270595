use crate::quantization_grid::Grid;

/// Canonical intermediate produced by the encoder and consumed by the
/// decoder.
///
/// All integer streams are in sorted vertex order and already
/// delta-transformed, except `int_normals` under smooth-normal rebasing
/// which are stored as-is. `delta_indices` holds the delta-coded triangle
/// list when `has_indices`, otherwise the delta-coded permutation mapping
/// each original vertex to its sorted position.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMesh {
    pub grid: Grid,
    pub int_positions: Vec<i16>,
    pub int_normals: Option<Vec<i32>>,
    pub int_uvs: Option<Vec<i16>>,
    pub delta_indices: Vec<i32>,
    pub use_smooth_normals: bool,
    pub has_indices: bool,
    pub quantized_bits_positions: u32,
    pub quantized_bits_normals: u32,
    pub quantized_bits_uvs: u32,
}

impl EncodedMesh {
    pub fn vertex_count(&self) -> usize {
        self.int_positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        if self.has_indices {
            self.delta_indices.len() / 3
        } else {
            self.vertex_count() / 3
        }
    }

    /// Index stride as stored: 3 for triangle lists, 1 for the permutation.
    pub fn index_stride(&self) -> usize {
        if self.has_indices {
            3
        } else {
            1
        }
    }
}
