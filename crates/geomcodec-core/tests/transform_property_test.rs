use proptest::prelude::*;

use geomcodec_core::attribute_quantization_transform::{dequantize_positions, quantize_positions};
use geomcodec_core::normal_compression_utils::SphericalToolBox;
use geomcodec_core::prediction_scheme_delta::{apply_delta, invert_delta, make_index_deltas, restore_indices};
use geomcodec_core::prediction_scheme_smooth_normal::compute_smooth_normals;
use geomcodec_core::quantization_grid::Grid;
use geomcodec_core::triangle_reorder::{canonicalize_and_reorder_triangles, reindex};
use geomcodec_core::vector_extensions::Vector3f;
use geomcodec_core::vertex_sort::{build_index_lut, sort_vertices};

fn positions(max_vertices: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1000.0f32..1000.0, 1..=max_vertices).prop_map(|mut v| {
        let whole = v.len() / 3 * 3;
        v.truncate(whole.max(3));
        v.resize(whole.max(3), 0.0);
        v
    })
}

/// Positions plus a triangle list referencing them.
fn indexed_mesh() -> impl Strategy<Value = (Vec<f32>, Vec<u32>)> {
    positions(60).prop_flat_map(|p| {
        let n = (p.len() / 3) as u32;
        let tris = prop::collection::vec(0..n, 0..=30).prop_map(|mut t| {
            t.truncate(t.len() / 3 * 3);
            t
        });
        (Just(p), tris)
    })
}

/// Positions sitting exactly on a power-of-two grid that spans cell 0 to
/// the last cell on every axis, plus the bit depth that grid implies.
fn grid_aligned_positions() -> impl Strategy<Value = (Vec<f32>, u32)> {
    (1u32..=10, -4i32..=4, -64i32..=64).prop_flat_map(|(bits, exponent, origin)| {
        let max_cell = (1u32 << bits) - 1;
        let step = 2f32.powi(exponent);
        let base = origin as f32 * step;
        prop::collection::vec(prop::array::uniform3(0..=max_cell), 0..=20).prop_map(move |cells| {
            let positions: Vec<f32> = [[0; 3], [max_cell; 3]]
                .into_iter()
                .chain(cells)
                .flatten()
                .map(|c| base + c as f32 * step)
                .collect();
            (positions, bits)
        })
    })
}

proptest! {
    #[test]
    fn grid_aligned_positions_roundtrip_exactly((p, bits) in grid_aligned_positions()) {
        let grid = Grid::from_positions(&p, bits).unwrap();
        let flat: Vec<u32> = quantize_positions(&p, &grid).into_iter().flatten().collect();
        prop_assert_eq!(dequantize_positions(&flat, &grid), p);
    }

    #[test]
    fn quantization_error_below_one_cell(p in positions(90), bits in 1u32..=15) {
        let grid = Grid::from_positions(&p, bits).unwrap();
        let cells = quantize_positions(&p, &grid);
        let flat: Vec<u32> = cells.iter().flatten().copied().collect();
        let restored = dequantize_positions(&flat, &grid);
        for (i, (a, b)) in p.iter().zip(&restored).enumerate() {
            let axis = i % 3;
            prop_assert!(flat[i] <= grid.max_cell(axis));
            let tolerance = grid.size[axis] * (1.0 + 1e-3) + 1e-3;
            prop_assert!((a - b).abs() <= tolerance, "{} vs {} cell {}", a, b, grid.size[axis]);
        }
    }

    #[test]
    fn delta_roundtrip(data in prop::collection::vec(any::<i16>(), 0..64), stride in 1usize..=4) {
        let mut data = data;
        data.truncate(data.len() / stride * stride);
        let original = data.clone();
        apply_delta(&mut data, stride).unwrap();
        invert_delta(&mut data, stride).unwrap();
        prop_assert_eq!(data, original);
    }

    #[test]
    fn index_delta_roundtrip((p, tris) in indexed_mesh()) {
        let n = p.len() / 3;
        let grid = Grid::from_positions(&p, 15).unwrap();
        let sorted = sort_vertices(&quantize_positions(&p, &grid), &grid);
        prop_assert_eq!(sorted.len(), n);

        let reordered = canonicalize_and_reorder_triangles(&reindex(&sorted.order, &tris).unwrap()).unwrap();
        let mut deltas: Vec<i32> = reordered.iter().map(|&i| i as i32).collect();
        make_index_deltas(&mut deltas).unwrap();
        restore_indices(&mut deltas).unwrap();
        let restored: Vec<u32> = deltas.iter().map(|&i| i as u32).collect();
        prop_assert_eq!(restored, reordered);
    }

    #[test]
    fn sort_is_a_permutation_ordered_by_cell((p, tris) in indexed_mesh()) {
        let grid = Grid::from_positions(&p, 12).unwrap();
        let sorted = sort_vertices(&quantize_positions(&p, &grid), &grid);
        for w in sorted.order.windows(2) {
            prop_assert!(w[0].grid_index <= w[1].grid_index);
        }

        let lut = build_index_lut(&sorted.order);
        let mut seen = vec![false; lut.len()];
        for &new in &lut {
            prop_assert!(!seen[new as usize]);
            seen[new as usize] = true;
        }

        // Re-indexed triangles point at the same cells as before.
        let cells = quantize_positions(&p, &grid);
        let reindexed = reindex(&sorted.order, &tris).unwrap();
        for (&old, &new) in tris.iter().zip(&reindexed) {
            prop_assert_eq!(cells[old as usize], sorted.cells[new as usize]);
        }
    }

    #[test]
    fn reordered_triangles_are_canonical((p, tris) in indexed_mesh()) {
        let n = (p.len() / 3) as u32;
        let reordered = canonicalize_and_reorder_triangles(&tris).unwrap();
        prop_assert_eq!(reordered.len(), tris.len());
        let triangles: Vec<&[u32]> = reordered.chunks_exact(3).collect();
        for t in &triangles {
            let distinct = t[0] != t[1] && t[1] != t[2] && t[0] != t[2];
            prop_assert!(!distinct || (t[0] < t[1] && t[0] < t[2]));
            prop_assert!(t.iter().all(|&i| i < n));
        }
        for w in triangles.windows(2) {
            prop_assert!((w[0][0], w[0][1]) <= (w[1][0], w[1][1]));
        }
    }

    #[test]
    fn smooth_normals_are_unit_or_zero((p, tris) in indexed_mesh()) {
        let normals = compute_smooth_normals(&p, &tris).unwrap();
        prop_assert_eq!(normals.len(), p.len() / 3);
        for n in normals {
            prop_assert!(n.is_finite());
            let len = n.length();
            prop_assert!(len < 1e-6 || (len - 1.0).abs() < 1e-4, "length {}", len);
        }
    }

    #[test]
    fn spherical_angles_stay_in_range(
        x in -1.0f32..1.0, y in -1.0f32..1.0, z in -1.0f32..1.0, bits in 1u32..=30
    ) {
        let toolbox = SphericalToolBox::new(bits).unwrap();
        let [theta, phi] = toolbox.unit_vector_to_quantized_angles(Vector3f::new(x, y, z));
        let max = toolbox.max_quantized_value();
        prop_assert!((0..=max).contains(&theta));
        prop_assert!((0..=max).contains(&phi));
        let v = toolbox.quantized_angles_to_unit_vector(theta, phi);
        prop_assert!((v.length() - 1.0).abs() < 1e-4);
    }
}
