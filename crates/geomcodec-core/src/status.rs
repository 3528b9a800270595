use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Degenerate grid: {0}")]
    DegenerateGrid(String),
    #[error("Unsupported datatype: {0}")]
    UnsupportedDatatype(String),
    #[error("Malformed container: {0}")]
    MalformedContainer(String),
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),
    #[error("Missing indices: {0}")]
    MissingIndices(String),
}

pub type Status = Result<(), CodecError>;

pub type StatusResult<T> = Result<T, CodecError>;

pub fn invalid_parameter(msg: impl Into<String>) -> CodecError {
    CodecError::InvalidParameter(msg.into())
}

pub fn malformed_container(msg: impl Into<String>) -> CodecError {
    CodecError::MalformedContainer(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = invalid_parameter("stride must be positive");
        assert_eq!(err.to_string(), "Invalid parameter: stride must be positive");

        let err = malformed_container("truncated header");
        assert_eq!(err.to_string(), "Malformed container: truncated header");

        let err = CodecError::UnsupportedDatatype("Float64Array".into());
        assert_eq!(err.to_string(), "Unsupported datatype: Float64Array");
    }
}
