use crate::status::{invalid_parameter, Status};

/// Raw geometry buffers as handed over by the scene graph.
///
/// `positions` and `normals` are stride 3, `uvs` stride 2, `indices` a
/// triangle list. Encoding consumes this; decoding produces it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<f32>,
    pub normals: Option<Vec<f32>>,
    pub uvs: Option<Vec<f32>>,
    pub indices: Option<Vec<u32>>,
}

impl Mesh {
    pub fn new(positions: Vec<f32>) -> Self {
        Self {
            positions,
            ..Self::default()
        }
    }

    pub fn with_normals(mut self, normals: Vec<f32>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<f32>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn num_points(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles, explicit or implied by consecutive vertex triples.
    pub fn num_faces(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.num_points() / 3,
        }
    }

    pub fn position(&self, point: usize) -> [f32; 3] {
        let base = point * 3;
        [self.positions[base], self.positions[base + 1], self.positions[base + 2]]
    }

    /// Checks buffer lengths against each other and indices against the
    /// vertex count.
    pub fn validate(&self) -> Status {
        if self.positions.is_empty() || self.positions.len() % 3 != 0 {
            return Err(invalid_parameter(format!(
                "positions must hold at least one xyz triple, got {} floats",
                self.positions.len()
            )));
        }
        let num_points = self.num_points();
        if u32::try_from(num_points).is_err() {
            return Err(invalid_parameter(format!("too many vertices: {}", num_points)));
        }

        if let Some(normals) = &self.normals {
            if normals.len() != num_points * 3 {
                return Err(invalid_parameter(format!(
                    "expected {} normal components, got {}",
                    num_points * 3,
                    normals.len()
                )));
            }
        }
        if let Some(uvs) = &self.uvs {
            if uvs.len() != num_points * 2 {
                return Err(invalid_parameter(format!(
                    "expected {} uv components, got {}",
                    num_points * 2,
                    uvs.len()
                )));
            }
        }
        if let Some(indices) = &self.indices {
            if indices.len() % 3 != 0 {
                return Err(invalid_parameter(format!(
                    "triangle list of {} indices is not a multiple of 3",
                    indices.len()
                )));
            }
            if let Some(&bad) = indices.iter().find(|&&i| i as usize >= num_points) {
                return Err(invalid_parameter(format!(
                    "index {} out of range for {} vertices",
                    bad, num_points
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mesh = Mesh::new(vec![0.0; 12]).with_indices(vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.num_points(), 4);
        assert_eq!(mesh.num_faces(), 2);
        assert!(mesh.validate().is_ok());

        let soup = Mesh::new(vec![0.0; 18]);
        assert_eq!(soup.num_faces(), 2);
    }

    #[test]
    fn test_validate_lengths() {
        assert!(Mesh::new(Vec::new()).validate().is_err());
        assert!(Mesh::new(vec![0.0; 4]).validate().is_err());
        assert!(Mesh::new(vec![0.0; 6]).with_normals(vec![0.0; 3]).validate().is_err());
        assert!(Mesh::new(vec![0.0; 6]).with_uvs(vec![0.0; 6]).validate().is_err());
        assert!(Mesh::new(vec![0.0; 9]).with_indices(vec![0, 1]).validate().is_err());
        assert!(Mesh::new(vec![0.0; 9]).with_indices(vec![0, 1, 3]).validate().is_err());
    }
}
