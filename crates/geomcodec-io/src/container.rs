//! Self-describing binary container.
//!
//! Layout:
//!
//! ```text
//! offset 0  : u32 magic
//! offset 4  : u32 version
//! offset 8  : u32 json_offset       (= 24)
//! offset 12 : u32 json_length       (bytes, even)
//! offset 16 : u32 bin_blob_offset   (= json_offset + json_length + padding)
//! offset 20 : u32 bin_blob_length
//! offset 24 : attribute table, UTF-16 JSON
//! padding   : (24 + json_length) % 4 zero bytes
//! blobs     : one typed array per attribute, in table order
//! ```
//!
//! Everything is little-endian.

use byteorder::{ByteOrder, LittleEndian};

use geomcodec_core::data_types::DataType;
use geomcodec_core::status::{invalid_parameter, malformed_container, CodecError, StatusResult};

use crate::attribute_table::{
    decode_attribute_table, encode_attribute_table, AttributeDescriptor, AttributeEncoding,
};
use crate::decoder_buffer::DecoderBuffer;
use crate::encoder_buffer::EncoderBuffer;
use crate::version::{json_padding, CONTAINER_MAGIC, CONTAINER_VERSION, HEADER_LENGTH};

// ============================================================================
// Typed attribute payloads
// ============================================================================

/// Owned typed array, one variant per [`DataType`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeData {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Float32(Vec<f32>),
}

impl AttributeData {
    pub fn data_type(&self) -> DataType {
        match self {
            AttributeData::Int8(_) => DataType::Int8,
            AttributeData::Uint8(_) => DataType::Uint8,
            AttributeData::Int16(_) => DataType::Int16,
            AttributeData::Uint16(_) => DataType::Uint16,
            AttributeData::Int32(_) => DataType::Int32,
            AttributeData::Uint32(_) => DataType::Uint32,
            AttributeData::Float32(_) => DataType::Float32,
        }
    }

    /// Number of elements (not tuples).
    pub fn len(&self) -> usize {
        match self {
            AttributeData::Int8(v) => v.len(),
            AttributeData::Uint8(v) => v.len(),
            AttributeData::Int16(v) => v.len(),
            AttributeData::Uint16(v) => v.len(),
            AttributeData::Int32(v) => v.len(),
            AttributeData::Uint32(v) => v.len(),
            AttributeData::Float32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn byte_length(&self) -> usize {
        self.len() * self.data_type().byte_length()
    }

    /// Little-endian bytes of the array.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.byte_length()];
        match self {
            AttributeData::Int8(v) => {
                for (dst, &src) in out.iter_mut().zip(v) {
                    *dst = src as u8;
                }
            }
            AttributeData::Uint8(v) => out.copy_from_slice(v),
            AttributeData::Int16(v) => LittleEndian::write_i16_into(v, &mut out),
            AttributeData::Uint16(v) => LittleEndian::write_u16_into(v, &mut out),
            AttributeData::Int32(v) => LittleEndian::write_i32_into(v, &mut out),
            AttributeData::Uint32(v) => LittleEndian::write_u32_into(v, &mut out),
            AttributeData::Float32(v) => LittleEndian::write_f32_into(v, &mut out),
        }
        out
    }

    /// Builds a typed array from little-endian bytes. `bytes.len()` must be a
    /// multiple of the element size.
    pub fn from_bytes(data_type: DataType, bytes: &[u8]) -> StatusResult<Self> {
        let element = data_type.byte_length();
        if bytes.len() % element != 0 {
            return Err(malformed_container(format!(
                "{} bytes do not hold whole {} elements",
                bytes.len(),
                data_type
            )));
        }
        let count = bytes.len() / element;
        Ok(match data_type {
            DataType::Int8 => AttributeData::Int8(bytes.iter().map(|&b| b as i8).collect()),
            DataType::Uint8 => AttributeData::Uint8(bytes.to_vec()),
            DataType::Int16 => {
                let mut v = vec![0i16; count];
                LittleEndian::read_i16_into(bytes, &mut v);
                AttributeData::Int16(v)
            }
            DataType::Uint16 => {
                let mut v = vec![0u16; count];
                LittleEndian::read_u16_into(bytes, &mut v);
                AttributeData::Uint16(v)
            }
            DataType::Int32 => {
                let mut v = vec![0i32; count];
                LittleEndian::read_i32_into(bytes, &mut v);
                AttributeData::Int32(v)
            }
            DataType::Uint32 => {
                let mut v = vec![0u32; count];
                LittleEndian::read_u32_into(bytes, &mut v);
                AttributeData::Uint32(v)
            }
            DataType::Float32 => {
                let mut v = vec![0f32; count];
                LittleEndian::read_f32_into(bytes, &mut v);
                AttributeData::Float32(v)
            }
        })
    }
}

/// A named attribute with its encoding and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerAttribute {
    pub name: String,
    pub encoding: AttributeEncoding,
    pub data: AttributeData,
}

impl ContainerAttribute {
    pub fn new(name: impl Into<String>, stride: usize, data: AttributeData) -> Self {
        let encoding = AttributeEncoding::new(stride, data.data_type());
        Self {
            name: name.into(),
            encoding,
            data,
        }
    }

    pub fn with_encoding(mut self, encoding: AttributeEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    fn validate(&self) -> StatusResult<()> {
        if self.encoding.stride == 0 {
            return Err(invalid_parameter(format!("attribute '{}' has stride 0", self.name)));
        }
        if self.encoding.data_type != self.data.data_type() {
            return Err(invalid_parameter(format!(
                "attribute '{}' declares {} but holds {}",
                self.name,
                self.encoding.data_type,
                self.data.data_type()
            )));
        }
        if self.data.len() % self.encoding.stride != 0 {
            return Err(invalid_parameter(format!(
                "attribute '{}' has {} values, not a multiple of stride {}",
                self.name,
                self.data.len(),
                self.encoding.stride
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Header
// ============================================================================

/// The six header fields. Built per call; never shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub magic: u32,
    pub version: u32,
    pub json_offset: u32,
    pub json_length: u32,
    pub bin_blob_offset: u32,
    pub bin_blob_length: u32,
}

impl ContainerHeader {
    fn for_lengths(json_length: usize, bin_blob_length: usize) -> StatusResult<Self> {
        let bin_blob_offset = HEADER_LENGTH + json_length + json_padding(json_length);
        let total = bin_blob_offset as u64 + bin_blob_length as u64;
        if total > u32::MAX as u64 {
            return Err(invalid_parameter(format!(
                "container of {} bytes exceeds the 32-bit header fields",
                total
            )));
        }
        Ok(Self {
            magic: CONTAINER_MAGIC,
            version: CONTAINER_VERSION,
            json_offset: HEADER_LENGTH as u32,
            json_length: json_length as u32,
            bin_blob_offset: bin_blob_offset as u32,
            bin_blob_length: bin_blob_length as u32,
        })
    }

    fn encode(&self, buffer: &mut EncoderBuffer) {
        buffer.encode_u32(self.magic);
        buffer.encode_u32(self.version);
        buffer.encode_u32(self.json_offset);
        buffer.encode_u32(self.json_length);
        buffer.encode_u32(self.bin_blob_offset);
        buffer.encode_u32(self.bin_blob_length);
    }

    fn decode(buffer: &mut DecoderBuffer) -> StatusResult<Self> {
        if buffer.remaining_size() < HEADER_LENGTH {
            return Err(malformed_container(format!(
                "truncated header: {} of {} bytes",
                buffer.remaining_size(),
                HEADER_LENGTH
            )));
        }
        Ok(Self {
            magic: buffer.decode_u32()?,
            version: buffer.decode_u32()?,
            json_offset: buffer.decode_u32()?,
            json_length: buffer.decode_u32()?,
            bin_blob_offset: buffer.decode_u32()?,
            bin_blob_length: buffer.decode_u32()?,
        })
    }

    /// Checks the header against itself and the total buffer length.
    fn validate(&self, total_length: usize) -> StatusResult<()> {
        if self.magic != CONTAINER_MAGIC {
            return Err(malformed_container(format!("bad magic {:#010x}", self.magic)));
        }
        if self.version == 0 {
            return Err(malformed_container("version 0"));
        }
        if self.version > CONTAINER_VERSION {
            return Err(CodecError::UnsupportedVersion(format!(
                "container version {} is newer than {}",
                self.version, CONTAINER_VERSION
            )));
        }
        if self.json_offset as usize != HEADER_LENGTH {
            return Err(malformed_container(format!(
                "json offset {} does not follow the {}-byte header",
                self.json_offset, HEADER_LENGTH
            )));
        }
        let json_length = self.json_length as usize;
        if json_length % 2 != 0 {
            return Err(malformed_container(format!(
                "odd UTF-16 byte length {}",
                json_length
            )));
        }
        let expected_blob_offset = HEADER_LENGTH as u64 + json_length as u64 + json_padding(json_length) as u64;
        if self.bin_blob_offset as u64 != expected_blob_offset {
            return Err(malformed_container(format!(
                "blob offset {} should be {}",
                self.bin_blob_offset, expected_blob_offset
            )));
        }
        let end = self.bin_blob_offset as u64 + self.bin_blob_length as u64;
        if end > total_length as u64 {
            return Err(malformed_container(format!(
                "blob region ends at {} but buffer holds {} bytes",
                end, total_length
            )));
        }
        Ok(())
    }
}

/// Reads and validates just the header.
pub fn read_header(data: &[u8]) -> StatusResult<ContainerHeader> {
    let mut buffer = DecoderBuffer::new(data);
    let header = ContainerHeader::decode(&mut buffer)?;
    header.validate(data.len())?;
    Ok(header)
}

/// Reads the header and the attribute table without touching the blobs.
pub fn read_attribute_table(data: &[u8]) -> StatusResult<(ContainerHeader, Vec<AttributeDescriptor>)> {
    let header = read_header(data)?;
    let mut buffer = DecoderBuffer::new(data);
    buffer.set_position(header.json_offset as usize)?;
    let units = buffer.decode_u16_vec(header.json_length as usize / 2)?;
    let table = decode_attribute_table(&units)?;
    Ok((header, table))
}

// ============================================================================
// Serialize / deserialize
// ============================================================================

/// Packs `attributes` into one buffer, blobs in the given order.
pub fn serialize(attributes: &[ContainerAttribute]) -> StatusResult<Vec<u8>> {
    let mut descriptors = Vec::with_capacity(attributes.len());
    let mut blobs = Vec::with_capacity(attributes.len());
    let mut offset = 0usize;
    for attribute in attributes {
        attribute.validate()?;
        let bytes = attribute.data.to_bytes();
        let (start, length) = match (u32::try_from(offset), u32::try_from(bytes.len())) {
            (Ok(start), Ok(length)) => (start, length),
            _ => {
                return Err(invalid_parameter(format!(
                    "attribute '{}' does not fit in a 32-bit offset",
                    attribute.name
                )))
            }
        };
        tracing::trace!(
            name = %attribute.name,
            datatype = %attribute.encoding.data_type,
            stride = attribute.encoding.stride,
            offset = start,
            length,
            "container attribute"
        );
        descriptors.push(AttributeDescriptor {
            name: attribute.name.clone(),
            offset: start,
            length,
            encoding: attribute.encoding.to_descriptor()?,
        });
        offset += bytes.len();
        blobs.push(bytes);
    }

    let units = encode_attribute_table(&descriptors)?;
    let json_length = units.len() * 2;
    let header = ContainerHeader::for_lengths(json_length, offset)?;

    let mut buffer = EncoderBuffer::with_capacity(header.bin_blob_offset as usize + offset);
    header.encode(&mut buffer);
    buffer.encode_u16_slice(&units);
    buffer.encode_padding(json_padding(json_length));
    for blob in &blobs {
        buffer.encode_bytes(blob);
    }
    Ok(buffer.into_inner())
}

/// Parses a container produced by [`serialize`].
pub fn deserialize(data: &[u8]) -> StatusResult<Vec<ContainerAttribute>> {
    let (header, table) = read_attribute_table(data)?;

    let mut buffer = DecoderBuffer::new(data);
    buffer.set_position(header.bin_blob_offset as usize)?;
    let blob_region = buffer.decode_bytes(header.bin_blob_length as usize)?;

    table
        .iter()
        .map(|descriptor| {
            let encoding = AttributeEncoding::from_descriptor(&descriptor.encoding)?;
            let start = descriptor.offset as usize;
            let end = start
                .checked_add(descriptor.length as usize)
                .filter(|&end| end <= blob_region.len())
                .ok_or_else(|| {
                    malformed_container(format!(
                        "attribute '{}' spans {}+{} outside a {}-byte blob region",
                        descriptor.name,
                        descriptor.offset,
                        descriptor.length,
                        blob_region.len()
                    ))
                })?;
            if (end - start) % encoding.tuple_byte_length() != 0 {
                return Err(malformed_container(format!(
                    "attribute '{}' length {} is not a multiple of {}-byte tuples",
                    descriptor.name,
                    descriptor.length,
                    encoding.tuple_byte_length()
                )));
            }
            tracing::trace!(
                name = %descriptor.name,
                datatype = %encoding.data_type,
                stride = encoding.stride,
                offset = descriptor.offset,
                length = descriptor.length,
                "container attribute"
            );
            Ok(ContainerAttribute {
                name: descriptor.name.clone(),
                encoding,
                data: AttributeData::from_bytes(encoding.data_type, &blob_region[start..end])?,
            })
        })
        .collect()
}
