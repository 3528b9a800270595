use std::collections::HashMap;

use crate::attribute_quantization_transform::DEFAULT_UV_QUANTIZATION_BITS;
use crate::normal_compression_utils::DEFAULT_NORMAL_QUANTIZATION_BITS;
use crate::quantization_grid::DEFAULT_POSITION_QUANTIZATION_BITS;
use crate::status::{invalid_parameter, Status};

pub const QUANTIZED_BITS_POSITIONS: &str = "quantized_bits_positions";
pub const QUANTIZED_BITS_NORMALS: &str = "quantized_bits_normals";
pub const QUANTIZED_BITS_UVS: &str = "quantized_bits_uvs";
pub const USE_SMOOTH_NORMALS: &str = "use_smooth_normals";

/// Positions and UVs are stored as `i16`.
pub const MAX_INT16_QUANTIZATION_BITS: i32 = 15;
pub const MAX_NORMAL_QUANTIZATION_BITS: i32 = 30;

#[derive(Debug, Clone, Default)]
pub struct EncoderOptions {
    global_options: HashMap<String, i32>,
}

impl EncoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantized_bits_positions(&self) -> u32 {
        self.get_global_int(QUANTIZED_BITS_POSITIONS, DEFAULT_POSITION_QUANTIZATION_BITS as i32) as u32
    }

    pub fn set_quantized_bits_positions(&mut self, bits: i32) {
        self.set_global_int(QUANTIZED_BITS_POSITIONS, bits);
    }

    pub fn quantized_bits_normals(&self) -> u32 {
        self.get_global_int(QUANTIZED_BITS_NORMALS, DEFAULT_NORMAL_QUANTIZATION_BITS as i32) as u32
    }

    pub fn set_quantized_bits_normals(&mut self, bits: i32) {
        self.set_global_int(QUANTIZED_BITS_NORMALS, bits);
    }

    pub fn quantized_bits_uvs(&self) -> u32 {
        self.get_global_int(QUANTIZED_BITS_UVS, DEFAULT_UV_QUANTIZATION_BITS as i32) as u32
    }

    pub fn set_quantized_bits_uvs(&mut self, bits: i32) {
        self.set_global_int(QUANTIZED_BITS_UVS, bits);
    }

    pub fn use_smooth_normals(&self) -> bool {
        self.get_global_int(USE_SMOOTH_NORMALS, 0) != 0
    }

    pub fn set_use_smooth_normals(&mut self, enabled: bool) {
        self.set_global_int(USE_SMOOTH_NORMALS, enabled as i32);
    }

    pub fn set_global_int(&mut self, key: &str, value: i32) {
        self.global_options.insert(key.to_string(), value);
    }

    pub fn get_global_int(&self, key: &str, default_val: i32) -> i32 {
        *self.global_options.get(key).unwrap_or(&default_val)
    }

    /// Checks every quantization setting against the storage width of its
    /// attribute.
    pub fn validate(&self) -> Status {
        let checks = [
            (QUANTIZED_BITS_POSITIONS, DEFAULT_POSITION_QUANTIZATION_BITS as i32, MAX_INT16_QUANTIZATION_BITS),
            (QUANTIZED_BITS_NORMALS, DEFAULT_NORMAL_QUANTIZATION_BITS as i32, MAX_NORMAL_QUANTIZATION_BITS),
            (QUANTIZED_BITS_UVS, DEFAULT_UV_QUANTIZATION_BITS as i32, MAX_INT16_QUANTIZATION_BITS),
        ];
        for (key, default_val, max) in checks {
            let bits = self.get_global_int(key, default_val);
            if !(1..=max).contains(&bits) {
                return Err(invalid_parameter(format!(
                    "{} must be in 1..={}, got {}",
                    key, max, bits
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
    fn test_defaults() {
        let options = EncoderOptions::new();
        assert_eq!(options.quantized_bits_positions(), 15);
        assert_eq!(options.quantized_bits_normals(), 12);
        assert_eq!(options.quantized_bits_uvs(), 12);
        assert!(!options.use_smooth_normals());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_setters() {
        let mut options = EncoderOptions::new();
        options.set_quantized_bits_positions(11);
        options.set_quantized_bits_normals(8);
        options.set_quantized_bits_uvs(10);
        options.set_use_smooth_normals(true);
        assert_eq!(options.quantized_bits_positions(), 11);
        assert_eq!(options.quantized_bits_normals(), 8);
        assert_eq!(options.quantized_bits_uvs(), 10);
        assert!(options.use_smooth_normals());
    }

    #[test]
    fn test_validate_ranges() {
        let mut options = EncoderOptions::new();
        options.set_quantized_bits_positions(16);
        assert!(options.validate().is_err());

        let mut options = EncoderOptions::new();
        options.set_quantized_bits_normals(0);
        assert!(options.validate().is_err());

        let mut options = EncoderOptions::new();
        options.set_quantized_bits_uvs(-3);
        assert!(options.validate().is_err());
    }
}
