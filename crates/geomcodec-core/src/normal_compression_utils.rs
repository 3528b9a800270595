use std::f32::consts::PI;

use crate::status::{invalid_parameter, StatusResult};
use crate::vector_extensions::Vector3f;
use crate::vertex_sort::SortVertex;

pub const DEFAULT_NORMAL_QUANTIZATION_BITS: u32 = 12;

/// Spherical-angle quantization of unit vectors.
///
/// A vector `(x, y, z)` is stored as `theta = floor(acos(y) / PI * 2^bits)`
/// and `phi = floor((PI + atan2(z, x)) / (2 PI) * 2^bits)`, both clamped to
/// `[0, 2^bits]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalToolBox {
    quantization_bits: u32,
    scale: f32,
}

impl SphericalToolBox {
    pub fn new(quantization_bits: u32) -> StatusResult<Self> {
        if !(1..=30).contains(&quantization_bits) {
            return Err(invalid_parameter(format!(
                "normal quantization bits must be in 1..=30, got {}",
                quantization_bits
            )));
        }
        Ok(Self {
            quantization_bits,
            scale: (1u32 << quantization_bits) as f32,
        })
    }

    pub fn quantization_bits(&self) -> u32 {
        self.quantization_bits
    }

    pub fn max_quantized_value(&self) -> i32 {
        1 << self.quantization_bits
    }

    pub fn unit_vector_to_quantized_angles(&self, v: Vector3f) -> [i32; 2] {
        let v = v.normalized_or_self();
        let theta = v.y.clamp(-1.0, 1.0).acos() / PI;
        let phi = (PI + v.z.atan2(v.x)) / (2.0 * PI);
        [self.quantize_angle(theta), self.quantize_angle(phi)]
    }

    /// Inverse of [`SphericalToolBox::unit_vector_to_quantized_angles`],
    /// renormalized to unit length.
    pub fn quantized_angles_to_unit_vector(&self, theta: i32, phi: i32) -> Vector3f {
        let theta = theta as f32 / self.scale * PI;
        let phi = phi as f32 / self.scale * (2.0 * PI) - PI;
        let r = theta.sin();
        Vector3f::new(r * phi.cos(), theta.cos(), r * phi.sin()).normalized_or_self()
    }

    fn quantize_angle(&self, fraction: f32) -> i32 {
        let q = (fraction * self.scale).floor();
        // NaN from a zero-length input lands on 0.
        (q as i32).clamp(0, self.max_quantized_value())
    }
}

/// Quantizes stride-3 normals against the global up axis, written in sorted
/// vertex order (stride 2 output).
pub fn quantize_normals(normals: &[f32], order: &[SortVertex], quantization_bits: u32) -> StatusResult<Vec<i32>> {
    let toolbox = SphericalToolBox::new(quantization_bits)?;
    if normals.len() != order.len() * 3 {
        return Err(invalid_parameter(format!(
            "expected {} normal components, got {}",
            order.len() * 3,
            normals.len()
        )));
    }

    let mut out = Vec::with_capacity(order.len() * 2);
    for v in order {
        let n = Vector3f::from_slice(normals, usize::from(v.original_index));
        out.extend_from_slice(&toolbox.unit_vector_to_quantized_angles(n));
    }
    Ok(out)
}

/// Inverse of [`quantize_normals`]; the output stays in sorted order.
pub fn dequantize_normals(int_normals: &[i32], quantization_bits: u32) -> StatusResult<Vec<f32>> {
    let toolbox = SphericalToolBox::new(quantization_bits)?;
    if int_normals.len() % 2 != 0 {
        return Err(invalid_parameter(format!(
            "quantized normals must come in pairs, got {} values",
            int_normals.len()
        )));
    }
    Ok(int_normals
        .chunks_exact(2)
        .flat_map(|q| toolbox.quantized_angles_to_unit_vector(q[0], q[1]).to_array())
        .collect())
}
