//! Re-indexing and canonical ordering of triangle lists.

use crate::status::{invalid_parameter, StatusResult};
use crate::vertex_sort::{build_index_lut, SortVertex};

/// Rewrites `old_indices` to reference the sorted vertex numbering.
pub fn reindex(order: &[SortVertex], old_indices: &[u32]) -> StatusResult<Vec<u32>> {
    let lut = build_index_lut(order);
    old_indices
        .iter()
        .map(|&old| {
            lut.get(old as usize).copied().ok_or_else(|| {
                invalid_parameter(format!(
                    "index {} out of range for {} vertices",
                    old,
                    lut.len()
                ))
            })
        })
        .collect()
}

/// Rotates a triangle so its smallest index comes first, keeping winding.
#[inline]
pub fn canonicalize_triangle([a, b, c]: [u32; 3]) -> [u32; 3] {
    if b < a && b < c {
        [b, c, a]
    } else if c < a && c < b {
        [c, a, b]
    } else {
        [a, b, c]
    }
}

/// Canonicalizes every triangle and sorts the list by (first, second).
///
/// The third index is not a sort key; triangles equal on the first two keep
/// their relative input order.
pub fn canonicalize_and_reorder_triangles(indices: &[u32]) -> StatusResult<Vec<u32>> {
    if indices.len() % 3 != 0 {
        return Err(invalid_parameter(format!(
            "triangle list of {} indices is not a multiple of 3",
            indices.len()
        )));
    }

    let mut triangles: Vec<[u32; 3]> = indices
        .chunks_exact(3)
        .map(|t| canonicalize_triangle([t[0], t[1], t[2]]))
        .collect();
    triangles.sort_by_key(|t| (t[0], t[1]));

    Ok(triangles.into_iter().flatten().collect())
}
