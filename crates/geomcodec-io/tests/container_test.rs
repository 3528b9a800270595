use byteorder::{ByteOrder, LittleEndian};
use proptest::prelude::*;

use geomcodec_core::data_types::DataType;
use geomcodec_core::status::CodecError;
use geomcodec_io::attribute_table::AttributeTransform;
use geomcodec_io::container::{deserialize, read_attribute_table, read_header, serialize, AttributeData, ContainerAttribute};
use geomcodec_io::version::{BIN_BLOB_LENGTH_OFFSET, HEADER_LENGTH, JSON_LENGTH_OFFSET, MAGIC_OFFSET, VERSION_OFFSET};
use geomcodec_io::AttributeEncoding;

fn position_attribute() -> ContainerAttribute {
    ContainerAttribute::new(
        "position",
        3,
        AttributeData::Float32(vec![0.0, 1.0, 2.0, -3.5, 4.25, 1e-3]),
    )
}

fn index_attribute() -> ContainerAttribute {
    ContainerAttribute::new("index", 1, AttributeData::Int32(vec![0, 1, 2, 2, 1, 3]))
}

fn set_field(data: &mut [u8], offset: usize, value: u32) {
    LittleEndian::write_u32(&mut data[offset..offset + 4], value);
}

#[test]
fn test_float_attribute_roundtrip() {
    let attributes = vec![position_attribute()];
    let data = serialize(&attributes).unwrap();
    assert_eq!(deserialize(&data).unwrap(), attributes);
}

#[test]
fn test_index_attribute_roundtrip() {
    let attributes = vec![index_attribute()];
    let data = serialize(&attributes).unwrap();
    let restored = deserialize(&data).unwrap();
    assert_eq!(restored[0].name, "index");
    assert_eq!(restored[0].encoding.stride, 1);
    assert_eq!(restored[0].encoding.data_type, DataType::Int32);
    assert_eq!(restored, attributes);
}

#[test]
fn test_combined_roundtrip() {
    let attributes = vec![
        index_attribute(),
        position_attribute().with_encoding(
            AttributeEncoding::new(3, DataType::Float32)
                .with_bits(11)
                .with_transform(AttributeTransform::Delta),
        ),
    ];
    let data = serialize(&attributes).unwrap();
    let (header, table) = read_attribute_table(&data).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[0].offset, 0);
    assert_eq!(table[1].offset, 24);
    assert_eq!(header.bin_blob_length, 48);
    assert_eq!(deserialize(&data).unwrap(), attributes);
}

#[test]
fn test_truncated_buffers() {
    let data = serialize(&[index_attribute(), position_attribute()]).unwrap();
    for len in [0, 3, HEADER_LENGTH - 1, HEADER_LENGTH, data.len() - 1] {
        assert!(
            matches!(deserialize(&data[..len]), Err(CodecError::MalformedContainer(_))),
            "length {}",
            len
        );
    }
}

#[test]
fn test_bad_magic() {
    let mut data = serialize(&[index_attribute()]).unwrap();
    set_field(&mut data, MAGIC_OFFSET, 0x1234_5678);
    assert!(matches!(read_header(&data), Err(CodecError::MalformedContainer(_))));
}

#[test]
fn test_newer_version() {
    let mut data = serialize(&[index_attribute()]).unwrap();
    set_field(&mut data, VERSION_OFFSET, 2);
    assert!(matches!(deserialize(&data), Err(CodecError::UnsupportedVersion(_))));
}

#[test]
fn test_inconsistent_lengths() {
    let data = serialize(&[index_attribute()]).unwrap();

    let mut odd_json = data.clone();
    let json_length = LittleEndian::read_u32(&data[JSON_LENGTH_OFFSET..]);
    set_field(&mut odd_json, JSON_LENGTH_OFFSET, json_length + 1);
    assert!(matches!(deserialize(&odd_json), Err(CodecError::MalformedContainer(_))));

    let mut long_blob = data.clone();
    let blob_length = LittleEndian::read_u32(&data[BIN_BLOB_LENGTH_OFFSET..]);
    set_field(&mut long_blob, BIN_BLOB_LENGTH_OFFSET, blob_length + 4);
    assert!(matches!(deserialize(&long_blob), Err(CodecError::MalformedContainer(_))));
}

#[test]
fn test_unsupported_datatype() {
    let data = serialize(&[index_attribute()]).unwrap();
    let (header, _) = read_attribute_table(&data).unwrap();
    let json_end = HEADER_LENGTH + header.json_length as usize;

    // Swap "Int32Array" for "Int64Array" in place; same length in UTF-16.
    let mut units = vec![0u16; header.json_length as usize / 2];
    LittleEndian::read_u16_into(&data[HEADER_LENGTH..json_end], &mut units);
    let json = String::from_utf16(&units).unwrap().replace("Int32Array", "Int64Array");
    let units: Vec<u16> = json.encode_utf16().collect();
    let mut patched = data.clone();
    LittleEndian::write_u16_into(&units, &mut patched[HEADER_LENGTH..json_end]);

    assert_eq!(
        deserialize(&patched),
        Err(CodecError::UnsupportedDatatype("Int64Array".into()))
    );
}

#[test]
fn test_attribute_outside_blob_region() {
    let data = serialize(&[index_attribute()]).unwrap();
    let (header, _) = read_attribute_table(&data).unwrap();
    let json_end = HEADER_LENGTH + header.json_length as usize;

    let mut units = vec![0u16; header.json_length as usize / 2];
    LittleEndian::read_u16_into(&data[HEADER_LENGTH..json_end], &mut units);
    let json = String::from_utf16(&units).unwrap().replace("\"length\":24", "\"length\":28");
    let units: Vec<u16> = json.encode_utf16().collect();
    let mut patched = data.clone();
    LittleEndian::write_u16_into(&units, &mut patched[HEADER_LENGTH..json_end]);

    assert!(matches!(deserialize(&patched), Err(CodecError::MalformedContainer(_))));
}

fn attribute_data() -> impl Strategy<Value = (usize, AttributeData)> {
    (1usize..=4, 0usize..=8).prop_flat_map(|(stride, tuples)| {
        let n = stride * tuples;
        let data = prop_oneof![
            prop::collection::vec(any::<i8>(), n).prop_map(AttributeData::Int8),
            prop::collection::vec(any::<u8>(), n).prop_map(AttributeData::Uint8),
            prop::collection::vec(any::<i16>(), n).prop_map(AttributeData::Int16),
            prop::collection::vec(any::<u16>(), n).prop_map(AttributeData::Uint16),
            prop::collection::vec(any::<i32>(), n).prop_map(AttributeData::Int32),
            prop::collection::vec(any::<u32>(), n).prop_map(AttributeData::Uint32),
            prop::collection::vec(-1e6f32..1e6, n).prop_map(AttributeData::Float32),
        ];
        (Just(stride), data)
    })
}

proptest! {
    #[test]
    fn container_roundtrip(entries in prop::collection::vec(attribute_data(), 0..5)) {
        let attributes: Vec<ContainerAttribute> = entries
            .into_iter()
            .enumerate()
            .map(|(i, (stride, data))| ContainerAttribute::new(format!("attr{}", i), stride, data))
            .collect();
        let data = serialize(&attributes).unwrap();
        let header = read_header(&data).unwrap();
        prop_assert_eq!(header.bin_blob_offset % 4, 0);
        prop_assert_eq!(deserialize(&data).unwrap(), attributes);
    }
}
