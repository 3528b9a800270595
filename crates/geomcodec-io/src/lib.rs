//! Geomcodec I/O library.
//!
//! Packs encoded meshes, or any list of typed attribute arrays, into a
//! single self-describing buffer: a fixed header, a UTF-16 JSON attribute
//! table and the concatenated binary blobs.
//!
//! ```
//! use geomcodec_core::{EncoderOptions, Mesh};
//! use geomcodec_io::{decode_mesh_from_container, encode_mesh_to_container};
//!
//! let mesh = Mesh::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
//!     .with_indices(vec![0, 1, 2]);
//! let bytes = encode_mesh_to_container(&mesh, &EncoderOptions::new()).unwrap();
//! let decoded = decode_mesh_from_container(&bytes).unwrap();
//! assert_eq!(decoded.num_faces(), 1);
//! ```

pub mod attribute_table;
pub mod container;
pub mod decoder_buffer;
pub mod encoder_buffer;
pub mod mesh_container;
pub mod version;

pub use attribute_table::{AttributeDescriptor, AttributeEncoding, AttributeTransform, EncodingDescriptor};
pub use container::{deserialize, read_attribute_table, read_header, serialize, AttributeData, ContainerAttribute, ContainerHeader};
pub use decoder_buffer::DecoderBuffer;
pub use encoder_buffer::EncoderBuffer;
pub use mesh_container::{
    decode_mesh_from_container, encode_mesh_to_container, from_attributes, read_mesh, to_attributes, write_mesh,
};
pub use version::{CONTAINER_MAGIC, CONTAINER_VERSION, HEADER_LENGTH};
