//! Mapping between an [`EncodedMesh`] and container attributes.
//!
//! Attributes are written in this order:
//!
//! | name       | type    | stride | extras                                   |
//! |------------|---------|--------|------------------------------------------|
//! | `index`    | Int32   | 3 / 1  | `triangle-delta` or `permutation`        |
//! | `bounds`   | Float32 | 3      | grid min then grid max                   |
//! | `position` | Int16   | 3      | `bits`, `delta`                          |
//! | `normal`   | Int32   | 2      | `bits`, `delta` or `smooth-normal`       |
//! | `uv`       | Int16   | 2      | `bits`, `delta`                          |
//!
//! `normal` and `uv` are optional.

use geomcodec_core::attribute_quantization_transform::DEFAULT_UV_QUANTIZATION_BITS;
use geomcodec_core::data_types::DataType;
use geomcodec_core::encoded_mesh::EncodedMesh;
use geomcodec_core::encoder_options::EncoderOptions;
use geomcodec_core::mesh::Mesh;
use geomcodec_core::mesh_decoder::decode_geometry;
use geomcodec_core::mesh_encoder::encode_geometry;
use geomcodec_core::normal_compression_utils::DEFAULT_NORMAL_QUANTIZATION_BITS;
use geomcodec_core::quantization_grid::Grid;
use geomcodec_core::status::{malformed_container, CodecError, StatusResult};
use geomcodec_core::vector_extensions::Vector3f;

use crate::attribute_table::{AttributeEncoding, AttributeTransform};
use crate::container::{deserialize, serialize, AttributeData, ContainerAttribute};

pub const INDEX_ATTRIBUTE: &str = "index";
pub const BOUNDS_ATTRIBUTE: &str = "bounds";
pub const POSITION_ATTRIBUTE: &str = "position";
pub const NORMAL_ATTRIBUTE: &str = "normal";
pub const UV_ATTRIBUTE: &str = "uv";

pub fn to_attributes(encoded: &EncodedMesh) -> Vec<ContainerAttribute> {
    let index_transform = if encoded.has_indices {
        AttributeTransform::TriangleDelta
    } else {
        AttributeTransform::Permutation
    };
    let stride = encoded.index_stride();
    let mut attributes = vec![
        ContainerAttribute::new(INDEX_ATTRIBUTE, stride, AttributeData::Int32(encoded.delta_indices.clone()))
            .with_encoding(AttributeEncoding::new(stride, DataType::Int32).with_transform(index_transform)),
        ContainerAttribute::new(BOUNDS_ATTRIBUTE, 3, AttributeData::Float32(bounds(&encoded.grid))),
        ContainerAttribute::new(POSITION_ATTRIBUTE, 3, AttributeData::Int16(encoded.int_positions.clone()))
            .with_encoding(
                AttributeEncoding::new(3, DataType::Int16)
                    .with_bits(encoded.quantized_bits_positions)
                    .with_transform(AttributeTransform::Delta),
            ),
    ];

    if let Some(normals) = &encoded.int_normals {
        let transform = if encoded.use_smooth_normals {
            AttributeTransform::SmoothNormal
        } else {
            AttributeTransform::Delta
        };
        attributes.push(
            ContainerAttribute::new(NORMAL_ATTRIBUTE, 2, AttributeData::Int32(normals.clone())).with_encoding(
                AttributeEncoding::new(2, DataType::Int32)
                    .with_bits(encoded.quantized_bits_normals)
                    .with_transform(transform),
            ),
        );
    }
    if let Some(uvs) = &encoded.int_uvs {
        attributes.push(
            ContainerAttribute::new(UV_ATTRIBUTE, 2, AttributeData::Int16(uvs.clone())).with_encoding(
                AttributeEncoding::new(2, DataType::Int16)
                    .with_bits(encoded.quantized_bits_uvs)
                    .with_transform(AttributeTransform::Delta),
            ),
        );
    }
    attributes
}

/// Rebuilds an [`EncodedMesh`] from container attributes. Unknown attribute
/// names are skipped.
pub fn from_attributes(attributes: Vec<ContainerAttribute>) -> StatusResult<EncodedMesh> {
    let mut index = None;
    let mut bounds = None;
    let mut position = None;
    let mut normal = None;
    let mut uv = None;
    for attribute in attributes {
        let slot = match attribute.name.as_str() {
            INDEX_ATTRIBUTE => &mut index,
            BOUNDS_ATTRIBUTE => &mut bounds,
            POSITION_ATTRIBUTE => &mut position,
            NORMAL_ATTRIBUTE => &mut normal,
            UV_ATTRIBUTE => &mut uv,
            _ => {
                tracing::trace!(name = %attribute.name, "skipping unknown attribute");
                continue;
            }
        };
        if slot.is_some() {
            return Err(malformed_container(format!("duplicate '{}' attribute", attribute.name)));
        }
        *slot = Some(attribute);
    }

    let index = index.ok_or_else(|| CodecError::MissingIndices("container has no index attribute".into()))?;
    let has_indices = match (index.encoding.transform, index.encoding.stride) {
        (Some(AttributeTransform::TriangleDelta), 3) | (None, 3) => true,
        (Some(AttributeTransform::Permutation), 1) | (None, 1) => false,
        (transform, stride) => {
            return Err(malformed_container(format!(
                "index attribute with stride {} and transform {:?}",
                stride, transform
            )))
        }
    };
    let delta_indices = match index.data {
        AttributeData::Int32(v) => v,
        other => return Err(wrong_type(INDEX_ATTRIBUTE, DataType::Int32, other.data_type())),
    };

    let position = required(position, POSITION_ATTRIBUTE)?;
    check_stride(&position, 3)?;
    let quantized_bits_positions = position
        .encoding
        .bits
        .ok_or_else(|| malformed_container("position attribute carries no bit count"))?;
    let int_positions = match position.data {
        AttributeData::Int16(v) => v,
        other => return Err(wrong_type(POSITION_ATTRIBUTE, DataType::Int16, other.data_type())),
    };

    let bounds = required(bounds, BOUNDS_ATTRIBUTE)?;
    let grid = match &bounds.data {
        AttributeData::Float32(v) if v.len() == 6 => Grid::from_bounds(
            Vector3f::new(v[0], v[1], v[2]),
            Vector3f::new(v[3], v[4], v[5]),
            quantized_bits_positions,
        )?,
        AttributeData::Float32(v) => {
            return Err(malformed_container(format!("bounds hold {} floats, expected 6", v.len())))
        }
        other => return Err(wrong_type(BOUNDS_ATTRIBUTE, DataType::Float32, other.data_type())),
    };

    let mut use_smooth_normals = false;
    let mut quantized_bits_normals = DEFAULT_NORMAL_QUANTIZATION_BITS;
    let int_normals = match normal {
        Some(normal) => {
            check_stride(&normal, 2)?;
            use_smooth_normals = normal.encoding.transform == Some(AttributeTransform::SmoothNormal);
            quantized_bits_normals = normal.encoding.bits.unwrap_or(quantized_bits_normals);
            match normal.data {
                AttributeData::Int32(v) => Some(v),
                other => return Err(wrong_type(NORMAL_ATTRIBUTE, DataType::Int32, other.data_type())),
            }
        }
        None => None,
    };

    let mut quantized_bits_uvs = DEFAULT_UV_QUANTIZATION_BITS;
    let int_uvs = match uv {
        Some(uv) => {
            check_stride(&uv, 2)?;
            quantized_bits_uvs = uv.encoding.bits.unwrap_or(quantized_bits_uvs);
            match uv.data {
                AttributeData::Int16(v) => Some(v),
                other => return Err(wrong_type(UV_ATTRIBUTE, DataType::Int16, other.data_type())),
            }
        }
        None => None,
    };

    Ok(EncodedMesh {
        grid,
        int_positions,
        int_normals,
        int_uvs,
        delta_indices,
        use_smooth_normals,
        has_indices,
        quantized_bits_positions,
        quantized_bits_normals,
        quantized_bits_uvs,
    })
}

/// Serializes an encoded mesh into a container.
pub fn write_mesh(encoded: &EncodedMesh) -> StatusResult<Vec<u8>> {
    let data = serialize(&to_attributes(encoded))?;
    tracing::debug!(
        bytes = data.len(),
        vertices = encoded.vertex_count(),
        triangles = encoded.triangle_count(),
        "wrote mesh container"
    );
    Ok(data)
}

pub fn read_mesh(data: &[u8]) -> StatusResult<EncodedMesh> {
    let encoded = from_attributes(deserialize(data)?)?;
    tracing::debug!(
        bytes = data.len(),
        vertices = encoded.vertex_count(),
        triangles = encoded.triangle_count(),
        "read mesh container"
    );
    Ok(encoded)
}

/// Encodes `mesh` and packs it in one call.
pub fn encode_mesh_to_container(mesh: &Mesh, options: &EncoderOptions) -> StatusResult<Vec<u8>> {
    write_mesh(&encode_geometry(mesh, options)?)
}

/// Unpacks and decodes a container in one call.
pub fn decode_mesh_from_container(data: &[u8]) -> StatusResult<Mesh> {
    decode_geometry(&read_mesh(data)?)
}

fn bounds(grid: &Grid) -> Vec<f32> {
    let mut v = grid.min.to_array().to_vec();
    v.extend_from_slice(&grid.max.to_array());
    v
}

fn required(attribute: Option<ContainerAttribute>, name: &str) -> StatusResult<ContainerAttribute> {
    attribute.ok_or_else(|| malformed_container(format!("missing '{}' attribute", name)))
}

fn check_stride(attribute: &ContainerAttribute, stride: usize) -> StatusResult<()> {
    if attribute.encoding.stride != stride {
        return Err(malformed_container(format!(
            "'{}' has stride {}, expected {}",
            attribute.name, attribute.encoding.stride, stride
        )));
    }
    Ok(())
}

fn wrong_type(name: &str, expected: DataType, found: DataType) -> CodecError {
    malformed_container(format!("'{}' is {}, expected {}", name, found, expected))
}
