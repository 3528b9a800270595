//! Normal encoding relative to per-vertex smooth normals.
//!
//! Both sides rebuild the same smooth normals from the decoded positions and
//! triangle list, derive an orthonormal frame per vertex whose Z axis is the
//! smooth normal, and spherically quantize the original normal expressed in
//! that frame. On locally smooth meshes the stored angles cluster tightly.
//!
//! This replaces, and is not combined with, plain delta coding of normals.

use crate::normal_compression_utils::SphericalToolBox;
use crate::status::{invalid_parameter, Status, StatusResult};
use crate::vector_extensions::{Matrix3f, Vector3f, NORMALIZE_EPSILON};
use crate::vertex_sort::SortVertex;

/// Accumulates normalized face normals into every corner vertex and
/// normalizes the sums.
///
/// The accumulator holds exactly one entry per vertex. Vertices referenced by
/// no triangle come back as the zero vector.
pub fn compute_smooth_normals(vertices: &[f32], indices: &[u32]) -> StatusResult<Vec<Vector3f>> {
    check_topology(vertices, indices)?;
    let num_vertices = vertices.len() / 3;
    let mut normals = vec![Vector3f::default(); num_vertices];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let p0 = Vector3f::from_slice(vertices, a);
        let p1 = Vector3f::from_slice(vertices, b);
        let p2 = Vector3f::from_slice(vertices, c);

        let face = (p1 - p0).cross(p2 - p0).normalized_or_self();
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    for n in normals.iter_mut() {
        *n = n.normalized_or_self();
    }
    Ok(normals)
}

/// Builds an orthonormal frame whose Z axis is `normal`.
///
/// X is `(-ny, nx - nz, ny)` normalized, which is orthogonal to the normal.
/// That vector vanishes when `ny == 0` and `nx == nz`; X then falls back to
/// `normal x (0, 1, 0)`. A zero normal (an isolated vertex) gets the identity
/// frame.
pub fn make_normal_coord_sys(normal: Vector3f) -> Matrix3f {
    if normal.length() <= NORMALIZE_EPSILON {
        return Matrix3f::IDENTITY;
    }
    let z_axis = normal;

    let mut x_axis = Vector3f::new(-normal.y, normal.x - normal.z, normal.y);
    if x_axis.length() <= 1e-6 {
        x_axis = normal.cross(Vector3f::new(0.0, 1.0, 0.0));
    }
    let x_axis = x_axis.normalized_or_self();
    let y_axis = z_axis.cross(x_axis);

    Matrix3f::from_cols(x_axis, y_axis, z_axis)
}

/// Encodes stride-3 `normals` (original vertex order) as angles relative to
/// the smooth-normal frames of the sorted mesh.
///
/// `vertices` and `indices` describe the sorted mesh exactly as the decoder
/// will see it: dequantized positions and the final triangle list.
pub fn encode_relative_to_smooth(
    normals: &[f32],
    vertices: &[f32],
    indices: &[u32],
    order: &[SortVertex],
    quantization_bits: u32,
) -> StatusResult<Vec<i32>> {
    let toolbox = SphericalToolBox::new(quantization_bits)?;
    if normals.len() != order.len() * 3 || vertices.len() != order.len() * 3 {
        return Err(invalid_parameter(format!(
            "normals ({}) and vertices ({}) must both hold {} components",
            normals.len(),
            vertices.len(),
            order.len() * 3
        )));
    }

    let smooth = compute_smooth_normals(vertices, indices)?;
    let mut out = Vec::with_capacity(order.len() * 2);
    for (v, &smooth_normal) in order.iter().zip(&smooth) {
        let n = Vector3f::from_slice(normals, usize::from(v.original_index));
        let local = make_normal_coord_sys(smooth_normal).transpose_mul_vector(n);
        out.extend_from_slice(&toolbox.unit_vector_to_quantized_angles(local));
    }
    Ok(out)
}

/// Inverse of [`encode_relative_to_smooth`]. Output is in sorted order.
pub fn decode_relative_to_smooth(
    int_normals: &[i32],
    vertices: &[f32],
    indices: &[u32],
    quantization_bits: u32,
) -> StatusResult<Vec<f32>> {
    let toolbox = SphericalToolBox::new(quantization_bits)?;
    let num_vertices = vertices.len() / 3;
    if int_normals.len() != num_vertices * 2 {
        return Err(invalid_parameter(format!(
            "expected {} quantized normal values, got {}",
            num_vertices * 2,
            int_normals.len()
        )));
    }

    let smooth = compute_smooth_normals(vertices, indices)?;
    let mut out = Vec::with_capacity(num_vertices * 3);
    for (q, &smooth_normal) in int_normals.chunks_exact(2).zip(&smooth) {
        let local = toolbox.quantized_angles_to_unit_vector(q[0], q[1]);
        let world = make_normal_coord_sys(smooth_normal).mul_vector(local);
        out.extend_from_slice(&world.normalized_or_self().to_array());
    }
    Ok(out)
}

fn check_topology(vertices: &[f32], indices: &[u32]) -> Status {
    if vertices.len() % 3 != 0 {
        return Err(invalid_parameter(format!(
            "vertex buffer of {} floats is not a multiple of 3",
            vertices.len()
        )));
    }
    if indices.len() % 3 != 0 {
        return Err(invalid_parameter(format!(
            "triangle list of {} indices is not a multiple of 3",
            indices.len()
        )));
    }
    let num_vertices = vertices.len() / 3;
    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= num_vertices) {
        return Err(invalid_parameter(format!(
            "index {} out of range for {} vertices",
            bad, num_vertices
        )));
    }
    Ok(())
}
