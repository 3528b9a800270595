//! Geomcodec Core Library
//!
//! Quantization, spatial reordering and delta coding of triangle meshes.
//! The encoder turns float position/normal/uv buffers plus an optional
//! triangle list into compact integer streams ([`EncodedMesh`]); the decoder
//! reverses it up to quantization loss.

#![allow(clippy::needless_range_loop)]

// =============================================================================
// Core modules - always available
// =============================================================================

pub mod attribute_quantization_transform;
pub mod data_types;
pub mod encoded_mesh;
pub mod geometry_indices;
pub mod mesh;
pub mod normal_compression_utils;
pub mod prediction_scheme_delta;
pub mod prediction_scheme_smooth_normal;
pub mod quantization_grid;
pub mod status;
pub mod triangle_reorder;
pub mod vector_extensions;
pub mod vertex_sort;

// =============================================================================
// Decoder-only modules
// =============================================================================

#[cfg(feature = "decoder")]
pub mod mesh_decoder;

// =============================================================================
// Encoder-only modules
// =============================================================================

#[cfg(feature = "encoder")]
pub mod encoder_options;
#[cfg(feature = "encoder")]
pub mod mesh_encoder;

// =============================================================================
// Core re-exports - always available
// =============================================================================

pub use data_types::DataType;
pub use encoded_mesh::EncodedMesh;
pub use geometry_indices::PointIndex;
pub use mesh::Mesh;
pub use normal_compression_utils::SphericalToolBox;
pub use prediction_scheme_delta::PredictionSchemeDelta;
pub use quantization_grid::Grid;
pub use status::{CodecError, Status, StatusResult};
pub use vector_extensions::{Matrix3f, Vector3f};
pub use vertex_sort::{SortVertex, SortedVertices};

// =============================================================================
// Decoder re-exports
// =============================================================================

#[cfg(feature = "decoder")]
pub use mesh_decoder::{decode_geometry, MeshDecoder};

// =============================================================================
// Encoder re-exports
// =============================================================================

#[cfg(feature = "encoder")]
pub use encoder_options::EncoderOptions;
#[cfg(feature = "encoder")]
pub use mesh_encoder::{encode_geometry, MeshEncoder};
