//! Delta (successive difference) transforms.
//!
//! Attribute streams use a fixed-stride delta: each tuple is replaced by its
//! difference to the previous tuple. Triangle lists use a dedicated scheme
//! that exploits the canonicalized, reordered layout produced by
//! [`crate::triangle_reorder`].
//!
//! All arithmetic wraps, so both transforms are exact inverses of each other
//! for every input, including saturated quantized values.

use num_traits::{WrappingAdd, WrappingSub};

use crate::status::{invalid_parameter, Status};

/// Fixed-stride delta transform over an integer stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionSchemeDelta {
    num_components: usize,
}

impl PredictionSchemeDelta {
    pub fn new(num_components: usize) -> Self {
        Self { num_components }
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    fn check(&self, len: usize) -> Status {
        if self.num_components == 0 {
            return Err(invalid_parameter("delta stride must be positive"));
        }
        if len % self.num_components != 0 {
            return Err(invalid_parameter(format!(
                "stream of {} values is not a multiple of stride {}",
                len, self.num_components
            )));
        }
        Ok(())
    }

    /// Replaces `data` in place with its corrections. Tuple 0 is left as is.
    pub fn compute_correction_values<T>(&self, data: &mut [T]) -> Status
    where
        T: Copy + WrappingSub,
    {
        self.check(data.len())?;
        let stride = self.num_components;

        // Encode from the back using D(i) = D(i) - D(i - 1) so the predecessor
        // is still the original value when it is read.
        for i in (stride..data.len()).rev() {
            data[i] = data[i].wrapping_sub(&data[i - stride]);
        }
        Ok(())
    }

    /// Restores the original values in place from corrections.
    pub fn compute_original_values<T>(&self, data: &mut [T]) -> Status
    where
        T: Copy + WrappingAdd,
    {
        self.check(data.len())?;
        let stride = self.num_components;

        // Decode from the front using D(i) = D(i) + D(i - 1).
        for i in stride..data.len() {
            data[i] = data[i].wrapping_add(&data[i - stride]);
        }
        Ok(())
    }
}

/// In-place delta encoding of `data` with the given stride.
pub fn apply_delta<T: Copy + WrappingSub>(data: &mut [T], stride: usize) -> Status {
    PredictionSchemeDelta::new(stride).compute_correction_values(data)
}

/// In-place inverse of [`apply_delta`].
pub fn invert_delta<T: Copy + WrappingAdd>(data: &mut [T], stride: usize) -> Status {
    PredictionSchemeDelta::new(stride).compute_original_values(data)
}

/// Delta-codes a canonicalized, reordered triangle list in place.
///
/// Triangles are processed from last to first. For triangle `i`:
/// - third becomes `third - first`,
/// - second becomes `second - second(i-1)` when triangle `i-1` has the same
///   first index, otherwise `second - first` (triangle 0 keeps its second),
/// - first becomes `first - first(i-1)` (triangle 0 keeps its first).
pub fn make_index_deltas(indices: &mut [i32]) -> Status {
    check_triangles(indices.len())?;
    let num_triangles = indices.len() / 3;

    for i in (0..num_triangles).rev() {
        let base = 3 * i;
        let first = indices[base];
        indices[base + 2] = indices[base + 2].wrapping_sub(first);

        if i == 0 {
            continue;
        }
        let prev = base - 3;
        let prev_first = indices[prev];
        indices[base + 1] = if prev_first == first {
            indices[base + 1].wrapping_sub(indices[prev + 1])
        } else {
            indices[base + 1].wrapping_sub(first)
        };
        indices[base] = first.wrapping_sub(prev_first);
    }
    Ok(())
}

/// In-place inverse of [`make_index_deltas`], processed first to last.
pub fn restore_indices(indices: &mut [i32]) -> Status {
    check_triangles(indices.len())?;
    let num_triangles = indices.len() / 3;

    for i in 0..num_triangles {
        let base = 3 * i;
        if i > 0 {
            let prev = base - 3;
            let first = indices[base].wrapping_add(indices[prev]);
            indices[base] = first;
            indices[base + 2] = indices[base + 2].wrapping_add(first);
            indices[base + 1] = if indices[prev] == first {
                indices[base + 1].wrapping_add(indices[prev + 1])
            } else {
                indices[base + 1].wrapping_add(first)
            };
        } else {
            indices[2] = indices[2].wrapping_add(indices[0]);
        }
    }
    Ok(())
}

fn check_triangles(len: usize) -> Status {
    if len % 3 != 0 {
        return Err(invalid_parameter(format!(
            "triangle list of {} indices is not a multiple of 3",
            len
        )));
    }
    Ok(())
}
