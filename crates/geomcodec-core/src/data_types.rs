//! Element types of container attribute blobs
//!
//! Every attribute blob is a flat typed array. The set of element types is
//! closed; the container names them with the typed-array constructor names
//! (`"Int16Array"`, `"Float32Array"`, ...).

use std::fmt;
use std::str::FromStr;

use crate::status::CodecError;

/// Element type of a flat attribute array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    Uint8,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    Uint16,
    /// 32-bit signed integer
    Int32,
    /// 32-bit unsigned integer
    Uint32,
    /// 32-bit floating point number
    Float32,
}

impl DataType {
    pub const ALL: [DataType; 7] = [
        DataType::Int8,
        DataType::Uint8,
        DataType::Int16,
        DataType::Uint16,
        DataType::Int32,
        DataType::Uint32,
        DataType::Float32,
    ];

    /// Returns the size of one element in bytes
    ///
    /// # Examples
    /// ```
    /// use geomcodec_core::data_types::DataType;
    /// assert_eq!(DataType::Int16.byte_length(), 2);
    /// assert_eq!(DataType::Float32.byte_length(), 4);
    /// ```
    pub const fn byte_length(self) -> usize {
        match self {
            DataType::Int8 | DataType::Uint8 => 1,
            DataType::Int16 | DataType::Uint16 => 2,
            DataType::Int32 | DataType::Uint32 | DataType::Float32 => 4,
        }
    }

    /// Returns the name used for this type in the attribute table
    pub const fn name(self) -> &'static str {
        match self {
            DataType::Int8 => "Int8Array",
            DataType::Uint8 => "Uint8Array",
            DataType::Int16 => "Int16Array",
            DataType::Uint16 => "Uint16Array",
            DataType::Int32 => "Int32Array",
            DataType::Uint32 => "Uint32Array",
            DataType::Float32 => "Float32Array",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .iter()
            .copied()
            .find(|dt| dt.name() == s)
            .ok_or_else(|| CodecError::UnsupportedDatatype(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_length() {
        assert_eq!(DataType::Int8.byte_length(), 1);
        assert_eq!(DataType::Uint8.byte_length(), 1);
        assert_eq!(DataType::Int16.byte_length(), 2);
        assert_eq!(DataType::Uint16.byte_length(), 2);
        assert_eq!(DataType::Int32.byte_length(), 4);
        assert_eq!(DataType::Uint32.byte_length(), 4);
        assert_eq!(DataType::Float32.byte_length(), 4);
    }

    #[test]
    fn test_parse_names() {
        for dt in DataType::ALL {
            assert_eq!(dt.name().parse::<DataType>(), Ok(dt));
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert_eq!(
            "Float64Array".parse::<DataType>(),
            Err(CodecError::UnsupportedDatatype("Float64Array".into()))
        );
        // Names are case sensitive.
        assert!("int16array".parse::<DataType>().is_err());
    }
}
