//! Small fixed-size vector and matrix types
//!
//! Only what the quantizers and the smooth-normal frames need: a 3D float
//! vector with the usual arithmetic and a 3x3 orthonormal basis.

use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// Lengths below this are treated as zero when normalizing.
pub const NORMALIZE_EPSILON: f32 = 1e-10;

/// A 3D vector with f32 components
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3f {
    /// Creates a new 3D float vector
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector with all components set to the same value
    #[inline]
    pub fn splat(value: f32) -> Self {
        Self { x: value, y: value, z: value }
    }

    /// Reads the vector stored at `index` in a flat stride-3 buffer
    #[inline]
    pub fn from_slice(data: &[f32], index: usize) -> Self {
        let base = index * 3;
        Self::new(data[base], data[base + 1], data[base + 2])
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Computes the dot product of two vectors
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Computes the cross product of two vectors
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns the vector divided by its length.
    ///
    /// A near-zero vector is divided by 1.0 instead, so it comes back
    /// unchanged rather than as NaN.
    #[inline]
    pub fn normalized_or_self(self) -> Self {
        let len = self.length();
        let scale = if len > NORMALIZE_EPSILON { len } else { 1.0 };
        self / scale
    }

    /// Returns the component-wise minimum of two vectors
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            z: self.z.min(other.z),
        }
    }

    /// Returns the component-wise maximum of two vectors
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
            z: self.z.max(other.z),
        }
    }

    /// Checks if all components are finite
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector3f {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vector3f {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vector3f {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl SubAssign for Vector3f {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<f32> for Vector3f {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Div<f32> for Vector3f {
    type Output = Self;

    #[inline]
    fn div(self, scalar: f32) -> Self {
        Self::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl Neg for Vector3f {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Index<usize> for Vector3f {
    type Output = f32;

    #[inline]
    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3f index out of bounds: {}", index),
        }
    }
}

impl IndexMut<usize> for Vector3f {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vector3f index out of bounds: {}", index),
        }
    }
}

/// A 3x3 matrix stored as three column axes.
///
/// Used as a local frame: `x_axis`, `y_axis` and `z_axis` are the images of
/// the local unit axes in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3f {
    pub x_axis: Vector3f,
    pub y_axis: Vector3f,
    pub z_axis: Vector3f,
}

impl Matrix3f {
    pub const IDENTITY: Self = Self {
        x_axis: Vector3f { x: 1.0, y: 0.0, z: 0.0 },
        y_axis: Vector3f { x: 0.0, y: 1.0, z: 0.0 },
        z_axis: Vector3f { x: 0.0, y: 0.0, z: 1.0 },
    };

    #[inline]
    pub fn from_cols(x_axis: Vector3f, y_axis: Vector3f, z_axis: Vector3f) -> Self {
        Self { x_axis, y_axis, z_axis }
    }

    /// Maps a local-frame vector to world space (`M * v`).
    #[inline]
    pub fn mul_vector(&self, v: Vector3f) -> Vector3f {
        self.x_axis * v.x + self.y_axis * v.y + self.z_axis * v.z
    }

    /// Maps a world-space vector into the local frame (`M^T * v`).
    #[inline]
    pub fn transpose_mul_vector(&self, v: Vector3f) -> Vector3f {
        Vector3f::new(self.x_axis.dot(v), self.y_axis.dot(v), self.z_axis.dot(v))
    }
}

impl Default for Matrix3f {
    fn default() -> Self {
        Self::IDENTITY
    }
}
