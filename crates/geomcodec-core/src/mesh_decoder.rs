use crate::attribute_quantization_transform::{dequantize_positions, dequantize_uvs};
use crate::encoded_mesh::EncodedMesh;
use crate::geometry_indices::{PointIndex, INVALID_POINT_INDEX};
use crate::mesh::Mesh;
use crate::normal_compression_utils::dequantize_normals;
use crate::prediction_scheme_delta::{invert_delta, restore_indices};
use crate::prediction_scheme_smooth_normal::decode_relative_to_smooth;
use crate::status::{malformed_container, Status, StatusResult};

#[derive(Debug, Default)]
pub struct MeshDecoder {
    num_decoded_faces: usize,
}

impl MeshDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_decoded_faces(&self) -> usize {
        self.num_decoded_faces
    }

    pub fn decode(&mut self, encoded: &EncodedMesh) -> StatusResult<Mesh> {
        let mesh = decode_geometry(encoded)?;
        self.num_decoded_faces = mesh.num_faces();
        Ok(mesh)
    }
}

/// Reverses `encode_geometry`.
///
/// Indexed meshes come back in sorted vertex order with the canonicalized,
/// reordered triangle list. Unindexed meshes come back in their original
/// vertex order with `indices` left unset.
pub fn decode_geometry(encoded: &EncodedMesh) -> StatusResult<Mesh> {
    check_lengths(encoded)?;
    let num_vertices = encoded.vertex_count();
    let grid = &encoded.grid;

    let mut int_positions = encoded.int_positions.clone();
    invert_delta(&mut int_positions, 3)?;
    let positions = dequantize_positions(&int_positions, grid);

    let mut topology = encoded.delta_indices.clone();
    if encoded.has_indices {
        restore_indices(&mut topology)?;
    } else {
        invert_delta(&mut topology, 1)?;
    }
    let topology = to_vertex_indices(&topology, num_vertices)?;

    // Sorted position of every original vertex, only for unindexed meshes.
    let permutation = if encoded.has_indices {
        None
    } else {
        check_permutation(&topology)?;
        Some(topology.as_slice())
    };

    let normals = match &encoded.int_normals {
        Some(int_normals) if encoded.use_smooth_normals => {
            if !encoded.has_indices && num_vertices % 3 != 0 {
                return Err(malformed_container(format!(
                    "smooth normals on {} unindexed vertices",
                    num_vertices
                )));
            }
            Some(decode_relative_to_smooth(
                int_normals,
                &positions,
                &topology,
                encoded.quantized_bits_normals,
            )?)
        }
        Some(int_normals) => {
            let mut q = int_normals.clone();
            invert_delta(&mut q, 2)?;
            Some(dequantize_normals(&q, encoded.quantized_bits_normals)?)
        }
        None => None,
    };

    let uvs = match &encoded.int_uvs {
        Some(int_uvs) => {
            let mut q = int_uvs.clone();
            invert_delta(&mut q, 2)?;
            Some(dequantize_uvs(&q, encoded.quantized_bits_uvs)?)
        }
        None => None,
    };

    let mesh = match permutation {
        Some(lut) => Mesh {
            positions: gather(&positions, lut, 3),
            normals: normals.map(|n| gather(&n, lut, 3)),
            uvs: uvs.map(|uv| gather(&uv, lut, 2)),
            indices: None,
        },
        None => Mesh {
            positions,
            normals,
            uvs,
            indices: Some(topology),
        },
    };

    tracing::debug!(
        vertices = num_vertices,
        triangles = mesh.num_faces(),
        has_indices = encoded.has_indices,
        "decoded mesh"
    );
    Ok(mesh)
}

fn check_lengths(encoded: &EncodedMesh) -> Status {
    let len = encoded.int_positions.len();
    if len == 0 || len % 3 != 0 {
        return Err(malformed_container(format!(
            "position stream of {} values",
            len
        )));
    }
    let num_vertices = len / 3;
    if let Some(n) = &encoded.int_normals {
        if n.len() != num_vertices * 2 {
            return Err(malformed_container(format!(
                "expected {} normal values, got {}",
                num_vertices * 2,
                n.len()
            )));
        }
    }
    if let Some(uv) = &encoded.int_uvs {
        if uv.len() != num_vertices * 2 {
            return Err(malformed_container(format!(
                "expected {} uv values, got {}",
                num_vertices * 2,
                uv.len()
            )));
        }
    }
    let indices = encoded.delta_indices.len();
    if encoded.has_indices && indices % 3 != 0 {
        return Err(malformed_container(format!(
            "triangle list of {} indices",
            indices
        )));
    }
    if !encoded.has_indices && indices != num_vertices {
        return Err(malformed_container(format!(
            "permutation of {} entries for {} vertices",
            indices, num_vertices
        )));
    }
    Ok(())
}

fn to_vertex_indices(values: &[i32], num_vertices: usize) -> StatusResult<Vec<u32>> {
    values
        .iter()
        .map(|&v| match u32::try_from(v) {
            Ok(i) if (i as usize) < num_vertices => Ok(i),
            _ => Err(malformed_container(format!(
                "index {} out of range for {} vertices",
                v, num_vertices
            ))),
        })
        .collect()
}

fn check_permutation(lut: &[u32]) -> Status {
    let mut seen = vec![INVALID_POINT_INDEX; lut.len()];
    for (original, &new) in lut.iter().enumerate() {
        let slot = &mut seen[new as usize];
        if *slot != INVALID_POINT_INDEX {
            return Err(malformed_container(format!(
                "vertices {} and {} both map to {}",
                slot.0, original, new
            )));
        }
        *slot = PointIndex::from(original);
    }
    Ok(())
}

/// `out[original] = sorted[lut[original]]`, per tuple of `stride`.
fn gather(sorted: &[f32], lut: &[u32], stride: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(lut.len() * stride);
    for &new in lut {
        let base = new as usize * stride;
        out.extend_from_slice(&sorted[base..base + stride]);
    }
    out
}
