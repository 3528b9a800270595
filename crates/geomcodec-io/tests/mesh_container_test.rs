use geomcodec_core::encoder_options::EncoderOptions;
use geomcodec_core::mesh::Mesh;
use geomcodec_core::mesh_encoder::encode_geometry;
use geomcodec_core::status::CodecError;
use geomcodec_io::container::{deserialize, serialize};
use geomcodec_io::mesh_container::{
    decode_mesh_from_container, encode_mesh_to_container, read_mesh, to_attributes, write_mesh, INDEX_ATTRIBUTE,
};
use geomcodec_io::AttributeTransform;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn pyramid() -> Mesh {
    let positions: Vec<f32> = vec![
        -1.0, 0.0, -1.0, //
        1.0, 0.0, -1.0, //
        1.0, 0.0, 1.0, //
        -1.0, 0.0, 1.0, //
        0.0, 2.0, 0.0,
    ];
    let normals: Vec<f32> = positions
        .chunks_exact(3)
        .flat_map(|p| {
            let len = (p[0] * p[0] + (p[1] - 0.5) * (p[1] - 0.5) + p[2] * p[2]).sqrt();
            [p[0] / len, (p[1] - 0.5) / len, p[2] / len]
        })
        .collect();
    let uvs = vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.5, 0.5];
    Mesh::new(positions)
        .with_normals(normals)
        .with_uvs(uvs)
        .with_indices(vec![0, 1, 2, 0, 2, 3, 0, 4, 1, 1, 4, 2, 2, 4, 3, 3, 4, 0])
}

#[test]
fn test_encoded_mesh_survives_container() {
    init_tracing();
    for smooth in [false, true] {
        let mut options = EncoderOptions::new();
        options.set_use_smooth_normals(smooth);
        options.set_quantized_bits_normals(10);
        let encoded = encode_geometry(&pyramid(), &options).unwrap();

        let bytes = write_mesh(&encoded).unwrap();
        assert_eq!(read_mesh(&bytes).unwrap(), encoded);
    }
}

#[test]
fn test_transforms_are_recorded() {
    let mut options = EncoderOptions::new();
    options.set_use_smooth_normals(true);
    let encoded = encode_geometry(&pyramid(), &options).unwrap();
    let attributes = deserialize(&write_mesh(&encoded).unwrap()).unwrap();

    let transform = |name: &str| {
        attributes
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.encoding.transform)
    };
    assert_eq!(transform("index"), Some(AttributeTransform::TriangleDelta));
    assert_eq!(transform("position"), Some(AttributeTransform::Delta));
    assert_eq!(transform("normal"), Some(AttributeTransform::SmoothNormal));
    assert_eq!(transform("uv"), Some(AttributeTransform::Delta));
}

#[test]
fn test_full_pipeline() {
    init_tracing();
    let mesh = pyramid();
    let bytes = encode_mesh_to_container(&mesh, &EncoderOptions::new()).unwrap();
    let decoded = decode_mesh_from_container(&bytes).unwrap();

    assert_eq!(decoded.num_points(), 5);
    assert_eq!(decoded.num_faces(), 6);
    // Same set of corner positions, independent of vertex order.
    let mut expected: Vec<[i32; 3]> = (0..5)
        .map(|i| mesh.position(i).map(|c| (c * 1000.0).round() as i32))
        .collect();
    let mut restored: Vec<[i32; 3]> = (0..5)
        .map(|i| decoded.position(i).map(|c| (c * 1000.0).round() as i32))
        .collect();
    expected.sort();
    restored.sort();
    assert_eq!(restored, expected);
}

#[test]
fn test_unindexed_pipeline_restores_order() {
    let mesh = Mesh::new(vec![
        9.0, 9.0, 9.0, 8.0, 9.0, 9.0, 9.0, 8.0, 9.0, //
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
    ]);
    let bytes = encode_mesh_to_container(&mesh, &EncoderOptions::new()).unwrap();
    let attributes = deserialize(&bytes).unwrap();
    assert_eq!(attributes[0].encoding.transform, Some(AttributeTransform::Permutation));
    assert_eq!(attributes[0].encoding.stride, 1);

    let decoded = decode_mesh_from_container(&bytes).unwrap();
    assert!(decoded.indices.is_none());
    for (a, b) in decoded.positions.iter().zip(&mesh.positions) {
        assert!((a - b).abs() < 1e-3, "{} vs {}", a, b);
    }
}

#[test]
fn test_missing_index_attribute() {
    let encoded = encode_geometry(&pyramid(), &EncoderOptions::new()).unwrap();
    let attributes: Vec<_> = to_attributes(&encoded)
        .into_iter()
        .filter(|a| a.name != INDEX_ATTRIBUTE)
        .collect();
    let bytes = serialize(&attributes).unwrap();
    assert!(matches!(read_mesh(&bytes), Err(CodecError::MissingIndices(_))));
}

#[test]
fn test_garbage_is_rejected() {
    assert!(decode_mesh_from_container(&[]).is_err());
    assert!(decode_mesh_from_container(&[0u8; 64]).is_err());
}
