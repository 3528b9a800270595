//! Spatial vertex sort.
//!
//! Vertices are ordered by their flattened grid cell so that neighbouring
//! vertices in the output are close in space, which keeps position deltas
//! small. The resulting order defines the new vertex numbering used by every
//! later stage.

use crate::geometry_indices::PointIndex;
use crate::quantization_grid::Grid;

/// One vertex as seen by the sorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortVertex {
    /// Flattened cell coordinate, see [`Grid::cell_index`].
    pub grid_index: u64,
    /// Vertex number before sorting.
    pub original_index: PointIndex,
}

/// Output of [`sort_vertices`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedVertices {
    /// Cell coordinates in sorted order; `cells[i]` belongs to new vertex `i`.
    pub cells: Vec<[u32; 3]>,
    /// `order[i].original_index` is the pre-sort number of new vertex `i`.
    pub order: Vec<SortVertex>,
}

impl SortedVertices {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Flat stride-3 cell coordinates narrowed to `i16`.
    ///
    /// Every coordinate is below `2^15` for grids of at most 15 bits, which
    /// the encoder options enforce.
    pub fn cells_as_i16(&self) -> Vec<i16> {
        self.cells
            .iter()
            .flat_map(|cell| cell.iter().map(|&c| c as i16))
            .collect()
    }

    /// Inverse permutation: `lut[original] == new`.
    pub fn index_lut(&self) -> Vec<u32> {
        build_index_lut(&self.order)
    }
}

/// Sorts vertices by grid cell.
///
/// The sort is stable, so vertices sharing a cell keep their input order and
/// the result is deterministic for a given input.
pub fn sort_vertices(cells: &[[u32; 3]], grid: &Grid) -> SortedVertices {
    let mut order: Vec<SortVertex> = cells
        .iter()
        .enumerate()
        .map(|(i, &cell)| SortVertex {
            grid_index: grid.cell_index(cell),
            original_index: PointIndex::from(i),
        })
        .collect();

    order.sort_by_key(|v| v.grid_index);

    let cells = order.iter().map(|v| grid.cell_coords(v.grid_index)).collect();

    SortedVertices { cells, order }
}

/// Builds `lut[original_index] = new_index` from a sort order.
pub fn build_index_lut(order: &[SortVertex]) -> Vec<u32> {
    let mut lut = vec![0u32; order.len()];
    for (new_index, v) in order.iter().enumerate() {
        lut[usize::from(v.original_index)] = new_index as u32;
    }
    lut
}
