//! JSON attribute table stored after the container header.
//!
//! The table is a JSON array with one entry per attribute:
//!
//! ```json
//! [{"name":"position","offset":0,"length":36,
//!   "encoding":{"stride":3,"datatype":"Int16Array","bits":15,"transform":"delta"}}]
//! ```
//!
//! and is stored as UTF-16 code units.

use serde::{Deserialize, Serialize};

use geomcodec_core::data_types::DataType;
use geomcodec_core::status::{invalid_parameter, malformed_container, StatusResult};

// ============================================================================
// JSON schema
// ============================================================================

/// One attribute entry as it appears in the JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    pub name: String,
    /// Byte offset relative to the start of the blob region.
    pub offset: u32,
    /// Byte length of the blob.
    pub length: u32,
    pub encoding: EncodingDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingDescriptor {
    pub stride: u32,
    /// Typed-array name; validated separately so an unknown name reports
    /// `UnsupportedDatatype` rather than a JSON error.
    pub datatype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<AttributeTransform>,
}

/// How the integers of an attribute were derived from the source values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeTransform {
    /// Fixed-stride successive differences.
    Delta,
    /// Spherical angles relative to per-vertex smooth-normal frames.
    SmoothNormal,
    /// Canonicalized, reordered triangle list with index deltas.
    TriangleDelta,
    /// Delta-coded map from original to sorted vertex numbers.
    Permutation,
}

// ============================================================================
// Typed view
// ============================================================================

/// Validated form of [`EncodingDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeEncoding {
    pub stride: usize,
    pub data_type: DataType,
    pub bits: Option<u32>,
    pub transform: Option<AttributeTransform>,
}

impl AttributeEncoding {
    pub fn new(stride: usize, data_type: DataType) -> Self {
        Self {
            stride,
            data_type,
            bits: None,
            transform: None,
        }
    }

    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits = Some(bits);
        self
    }

    pub fn with_transform(mut self, transform: AttributeTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Bytes per stride-sized tuple.
    pub fn tuple_byte_length(&self) -> usize {
        self.stride * self.data_type.byte_length()
    }

    pub fn to_descriptor(&self) -> StatusResult<EncodingDescriptor> {
        let stride = u32::try_from(self.stride)
            .ok()
            .filter(|&s| s > 0)
            .ok_or_else(|| invalid_parameter(format!("invalid attribute stride {}", self.stride)))?;
        Ok(EncodingDescriptor {
            stride,
            datatype: self.data_type.name().to_string(),
            bits: self.bits,
            transform: self.transform,
        })
    }

    pub fn from_descriptor(descriptor: &EncodingDescriptor) -> StatusResult<Self> {
        let data_type = descriptor.datatype.parse::<DataType>()?;
        if descriptor.stride == 0 {
            return Err(malformed_container("attribute stride of 0"));
        }
        Ok(Self {
            stride: descriptor.stride as usize,
            data_type,
            bits: descriptor.bits,
            transform: descriptor.transform,
        })
    }
}

// ============================================================================
// Text encoding
// ============================================================================

/// Serializes the table to JSON and returns its UTF-16 code units.
pub fn encode_attribute_table(descriptors: &[AttributeDescriptor]) -> StatusResult<Vec<u16>> {
    let json = serde_json::to_string(descriptors)
        .map_err(|e| invalid_parameter(format!("attribute table: {}", e)))?;
    Ok(json.encode_utf16().collect())
}

pub fn decode_attribute_table(code_units: &[u16]) -> StatusResult<Vec<AttributeDescriptor>> {
    let json = String::from_utf16(code_units)
        .map_err(|e| malformed_container(format!("attribute table is not UTF-16: {}", e)))?;
    serde_json::from_str(&json)
        .map_err(|e| malformed_container(format!("attribute table: {}", e)))
}
