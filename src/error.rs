//! Error types for the content engine
//!
//! The public transformation functions are total and never return these;
//! errors only surface at the parser capability boundary and the C ABI.

use std::fmt;

/// Errors that can occur while parsing markup or crossing the C ABI
#[derive(Debug)]
pub enum ConversionError {
    /// Markup parsing failed
    ParseError(String),
    /// Invalid input data (null pointers, non-UTF-8 bytes)
    InvalidInput(String),
    /// Internal error (caught panic, unexpected condition)
    InternalError(String),
}

impl ConversionError {
    /// Get numeric error code for FFI
    pub fn code(&self) -> u32 {
        match self {
            ConversionError::ParseError(_) => 1,
            ConversionError::InvalidInput(_) => 5,
            ConversionError::InternalError(_) => 99,
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConversionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ConversionError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ConversionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ConversionError::ParseError(String::new()).code(), 1);
        assert_eq!(ConversionError::InvalidInput(String::new()).code(), 5);
        assert_eq!(ConversionError::InternalError(String::new()).code(), 99);
    }

    #[test]
    fn test_display_includes_message() {
        let err = ConversionError::InvalidInput("null pointer".to_string());
        assert_eq!(err.to_string(), "Invalid input: null pointer");
    }
}
