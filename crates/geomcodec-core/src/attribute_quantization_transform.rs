//! Fixed-point quantization of positions and texture coordinates.

use num_traits::AsPrimitive;

use crate::quantization_grid::Grid;
use crate::status::{invalid_parameter, StatusResult};
use crate::vertex_sort::SortVertex;

pub const DEFAULT_UV_QUANTIZATION_BITS: u32 = 12;

/// Maps each position to its grid cell: `floor((x - min) / size)` per axis.
///
/// Results are clamped into `[0, division - 1]`; floating-point rounding at
/// the max bound can otherwise land one past the last cell. Degenerate axes
/// quantize to 0.
pub fn quantize_positions(positions: &[f32], grid: &Grid) -> Vec<[u32; 3]> {
    let mut clamped = 0usize;
    let cells = positions
        .chunks_exact(3)
        .map(|p| {
            let mut cell = [0u32; 3];
            for axis in 0..3 {
                if grid.is_degenerate_axis(axis) {
                    continue;
                }
                let q = ((p[axis] - grid.min[axis]) / grid.size[axis]).floor();
                let max_cell = grid.max_cell(axis);
                cell[axis] = if q <= 0.0 {
                    0
                } else if q >= max_cell as f32 {
                    if q > max_cell as f32 {
                        clamped += 1;
                    }
                    max_cell
                } else {
                    q as u32
                };
            }
            cell
        })
        .collect();

    if clamped > 0 {
        tracing::trace!(clamped, "clamped position coordinates onto the grid bound");
    }
    cells
}

/// Inverse affine map of [`quantize_positions`]: `x = min + cell * size`.
///
/// Lossy: the result differs from the original by less than one cell.
pub fn dequantize_positions<T: AsPrimitive<f32>>(int_positions: &[T], grid: &Grid) -> Vec<f32> {
    int_positions
        .chunks_exact(3)
        .flat_map(|cell| {
            (0..3).map(move |axis| grid.min[axis] + cell[axis].as_() * grid.size[axis])
        })
        .collect()
}

/// Quantizes stride-2 texture coordinates to `floor(u * 2^bits)`, written in
/// sorted vertex order.
///
/// Values outside the `i16` range saturate.
pub fn quantize_uvs(uvs: &[f32], order: &[SortVertex], quantization_bits: u32) -> StatusResult<Vec<i16>> {
    check_uv_bits(quantization_bits)?;
    if uvs.len() != order.len() * 2 {
        return Err(invalid_parameter(format!(
            "expected {} uv components, got {}",
            order.len() * 2,
            uvs.len()
        )));
    }

    let scale = (1u32 << quantization_bits) as f32;
    let mut saturated = 0usize;
    let mut out = Vec::with_capacity(uvs.len());
    for v in order {
        let base = usize::from(v.original_index) * 2;
        for c in 0..2 {
            let q = (uvs[base + c] * scale).floor();
            if q < i16::MIN as f32 || q > i16::MAX as f32 || q.is_nan() {
                saturated += 1;
            }
            // `as` saturates and maps NaN to 0.
            out.push(q as i16);
        }
    }

    if saturated > 0 {
        tracing::warn!(
            saturated,
            quantization_bits,
            "uv values outside the representable range were saturated"
        );
    }
    Ok(out)
}

/// Inverse of [`quantize_uvs`]: `u = q / 2^bits`.
pub fn dequantize_uvs(int_uvs: &[i16], quantization_bits: u32) -> StatusResult<Vec<f32>> {
    check_uv_bits(quantization_bits)?;
    let scale = (1u32 << quantization_bits) as f32;
    Ok(int_uvs.iter().map(|&q| q as f32 / scale).collect())
}

fn check_uv_bits(quantization_bits: u32) -> StatusResult<()> {
    if !(1..=15).contains(&quantization_bits) {
        return Err(invalid_parameter(format!(
            "uv quantization bits must be in 1..=15, got {}",
            quantization_bits
        )));
    }
    Ok(())
}
