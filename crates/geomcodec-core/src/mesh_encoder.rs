use crate::attribute_quantization_transform::{dequantize_positions, quantize_positions, quantize_uvs};
use crate::encoded_mesh::EncodedMesh;
use crate::encoder_options::EncoderOptions;
use crate::mesh::Mesh;
use crate::normal_compression_utils::quantize_normals;
use crate::prediction_scheme_delta::{apply_delta, make_index_deltas};
use crate::prediction_scheme_smooth_normal::encode_relative_to_smooth;
use crate::quantization_grid::Grid;
use crate::status::{invalid_parameter, CodecError, StatusResult};
use crate::triangle_reorder::{canonicalize_and_reorder_triangles, reindex};
use crate::vertex_sort::sort_vertices;

/// Drives the encode pipeline for one mesh.
///
/// ```
/// use geomcodec_core::{EncoderOptions, Mesh, MeshEncoder};
///
/// let mesh = Mesh::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
///     .with_indices(vec![0, 1, 2]);
/// let mut encoder = MeshEncoder::new();
/// encoder.set_mesh(mesh);
/// let encoded = encoder.encode(&EncoderOptions::new()).unwrap();
/// assert_eq!(encoded.triangle_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MeshEncoder {
    mesh: Option<Mesh>,
    num_encoded_faces: usize,
}

impl MeshEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.mesh = Some(mesh);
    }

    pub fn num_encoded_faces(&self) -> usize {
        self.num_encoded_faces
    }

    pub fn encode(&mut self, options: &EncoderOptions) -> StatusResult<EncodedMesh> {
        let mesh = self
            .mesh
            .as_ref()
            .ok_or_else(|| invalid_parameter("no mesh set on encoder"))?;
        let encoded = encode_geometry(mesh, options)?;
        self.num_encoded_faces = encoded.triangle_count();
        Ok(encoded)
    }
}

/// Quantizes, sorts and delta-codes a mesh.
///
/// Stages, each feeding the next through its return value:
/// grid → cell quantization → spatial sort → re-index (or permutation) →
/// attribute quantization in sorted order → delta transforms.
pub fn encode_geometry(mesh: &Mesh, options: &EncoderOptions) -> StatusResult<EncodedMesh> {
    options.validate()?;
    mesh.validate()?;

    let bits_positions = options.quantized_bits_positions();
    let bits_normals = options.quantized_bits_normals();
    let bits_uvs = options.quantized_bits_uvs();
    let use_smooth_normals = options.use_smooth_normals() && mesh.normals.is_some();
    let num_points = mesh.num_points();

    let grid = Grid::from_positions(&mesh.positions, bits_positions)?;
    tracing::debug!(
        num_points,
        bits = bits_positions,
        min = ?grid.min.to_array(),
        max = ?grid.max.to_array(),
        "built quantization grid"
    );

    let cells = quantize_positions(&mesh.positions, &grid);
    let sorted = sort_vertices(&cells, &grid);
    let sorted_positions = sorted.cells_as_i16();

    // Triangle list in sorted numbering, or the permutation that restores
    // the original vertex order of an unindexed mesh.
    let topology = match &mesh.indices {
        Some(indices) => {
            let reindexed = reindex(&sorted.order, indices)?;
            canonicalize_and_reorder_triangles(&reindexed)?
        }
        None => sorted.index_lut(),
    };

    let int_normals = match &mesh.normals {
        Some(normals) if use_smooth_normals => {
            if mesh.indices.is_none() && num_points % 3 != 0 {
                return Err(invalid_parameter(format!(
                    "smooth normals on an unindexed mesh need whole triangles, got {} vertices",
                    num_points
                )));
            }
            let vertices = dequantize_positions(&sorted_positions, &grid);
            Some(encode_relative_to_smooth(
                normals,
                &vertices,
                &topology,
                &sorted.order,
                bits_normals,
            )?)
        }
        Some(normals) => {
            let mut q = quantize_normals(normals, &sorted.order, bits_normals)?;
            apply_delta(&mut q, 2)?;
            Some(q)
        }
        None => None,
    };

    let int_uvs = match &mesh.uvs {
        Some(uvs) => {
            let mut q = quantize_uvs(uvs, &sorted.order, bits_uvs)?;
            apply_delta(&mut q, 2)?;
            Some(q)
        }
        None => None,
    };

    let has_indices = mesh.indices.is_some();
    let mut delta_indices = topology
        .iter()
        .map(|&i| i32::try_from(i).map_err(|_| invalid_parameter(format!("index {} exceeds i32", i))))
        .collect::<Result<Vec<i32>, CodecError>>()?;
    if has_indices {
        make_index_deltas(&mut delta_indices)?;
    } else {
        apply_delta(&mut delta_indices, 1)?;
    }

    let mut int_positions = sorted_positions;
    apply_delta(&mut int_positions, 3)?;

    let encoded = EncodedMesh {
        grid,
        int_positions,
        int_normals,
        int_uvs,
        delta_indices,
        use_smooth_normals,
        has_indices,
        quantized_bits_positions: bits_positions,
        quantized_bits_normals: bits_normals,
        quantized_bits_uvs: bits_uvs,
    };
    tracing::debug!(
        vertices = encoded.vertex_count(),
        triangles = encoded.triangle_count(),
        has_indices,
        use_smooth_normals,
        "encoded mesh"
    );
    Ok(encoded)
}
