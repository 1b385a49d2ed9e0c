//! Error handling for the Lion policy system.
//!
//! This module provides error conversion functions to handle
//! errors from dependent crates.

use lion_core::error::Error;

/// Convert a TOML parse error to lion_core::error::Error
pub fn toml_error_to_core_error(err: toml::de::Error) -> Error {
    Error::Config(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Table>("[scope").unwrap_err();
        let error = toml_error_to_core_error(toml_err);
        assert!(matches!(error, Error::Config(_)));
    }
}
