//! Axis-aligned quantization grid over a position buffer.

use crate::status::{invalid_parameter, CodecError, StatusResult};
use crate::vector_extensions::Vector3f;

pub const DEFAULT_POSITION_QUANTIZATION_BITS: u32 = 15;

/// Largest bit count for which a flattened cell index still fits in a `u64`.
pub const MAX_GRID_QUANTIZATION_BITS: u32 = 21;

/// Bounding box split into `2^bits` cells per axis.
///
/// `size[axis] == (max[axis] - min[axis]) / (division[axis] - 1)`. An axis
/// whose extent is zero has a cell size of zero: every coordinate on it
/// quantizes to cell 0 and dequantizes back to `min` exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub min: Vector3f,
    pub max: Vector3f,
    pub division: [u32; 3],
    pub size: Vector3f,
    quantization_bits: u32,
}

impl Grid {
    /// Scans a stride-3 position buffer and builds the grid around it.
    ///
    /// At least one vertex is required.
    pub fn from_positions(positions: &[f32], quantization_bits: u32) -> StatusResult<Self> {
        if positions.is_empty() || positions.len() % 3 != 0 {
            return Err(invalid_parameter(format!(
                "position buffer must hold at least one xyz triple, got {} floats",
                positions.len()
            )));
        }

        let mut min = Vector3f::splat(f32::MAX);
        let mut max = Vector3f::splat(f32::MIN);
        for p in positions.chunks_exact(3) {
            let v = Vector3f::new(p[0], p[1], p[2]);
            if !v.is_finite() {
                return Err(CodecError::DegenerateGrid(format!(
                    "non-finite position {:?}",
                    v.to_array()
                )));
            }
            min = min.min(v);
            max = max.max(v);
        }

        Self::from_bounds(min, max, quantization_bits)
    }

    /// Rebuilds a grid from stored bounds, as the decoder does.
    ///
    /// Fails with `DegenerateGrid` for non-finite or inverted bounds, and
    /// when a single cell would be wider than `f32::MAX` (only reachable at
    /// 1 bit with bounds spanning most of the `f32` range).
    pub fn from_bounds(min: Vector3f, max: Vector3f, quantization_bits: u32) -> StatusResult<Self> {
        if !(1..=MAX_GRID_QUANTIZATION_BITS).contains(&quantization_bits) {
            return Err(invalid_parameter(format!(
                "grid quantization bits must be in 1..={}, got {}",
                MAX_GRID_QUANTIZATION_BITS, quantization_bits
            )));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(CodecError::DegenerateGrid(format!(
                "non-finite bounds {:?}..{:?}",
                min.to_array(),
                max.to_array()
            )));
        }
        for axis in 0..3 {
            if max[axis] < min[axis] {
                return Err(CodecError::DegenerateGrid(format!(
                    "inverted bounds on axis {}: {} > {}",
                    axis, min[axis], max[axis]
                )));
            }
        }

        let cells = 1u32 << quantization_bits;
        let division = [cells; 3];
        let mut size = Vector3f::default();
        for axis in 0..3 {
            let steps = (division[axis] - 1) as f32;
            size[axis] = (max[axis] - min[axis]) / steps;
            if !size[axis].is_finite() {
                // max - min overflowed; the per-step extent may still fit.
                size[axis] = max[axis] / steps - min[axis] / steps;
            }
        }
        if !size.is_finite() {
            return Err(CodecError::DegenerateGrid(format!(
                "cell size overflows: {:?}..{:?}",
                min.to_array(),
                max.to_array()
            )));
        }

        Ok(Self {
            min,
            max,
            division,
            size,
            quantization_bits,
        })
    }

    pub fn quantization_bits(&self) -> u32 {
        self.quantization_bits
    }

    pub fn cell_size(&self) -> Vector3f {
        self.size
    }

    /// Highest valid cell coordinate on `axis`.
    pub fn max_cell(&self, axis: usize) -> u32 {
        self.division[axis] - 1
    }

    /// True when every position shares the same coordinate on `axis`.
    pub fn is_degenerate_axis(&self, axis: usize) -> bool {
        self.size[axis] <= 0.0
    }

    /// Flattens a cell coordinate: `ix + dx * (iy + dy * iz)`.
    pub fn cell_index(&self, cell: [u32; 3]) -> u64 {
        let dx = self.division[0] as u64;
        let dy = self.division[1] as u64;
        cell[0] as u64 + dx * (cell[1] as u64 + dy * cell[2] as u64)
    }

    /// Inverse of [`Grid::cell_index`].
    pub fn cell_coords(&self, index: u64) -> [u32; 3] {
        let dx = self.division[0] as u64;
        let dxy = dx * self.division[1] as u64;
        [
            (index % dx) as u32,
            ((index % dxy) / dx) as u32,
            (index / dxy) as u32,
        ]
    }
}
