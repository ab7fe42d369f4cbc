use thiserror::Error;

/// Errors that can occur while parsing an address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Invalid hexadecimal string format
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Hex string does not encode exactly one address
    #[error("Invalid hex length: {len} characters, expected: {expected} characters")]
    InvalidHexLength { len: usize, expected: usize },

    /// Raw bytes have the wrong width
    #[error("Invalid address length: {len} bytes, expected: {expected} bytes")]
    InvalidLength { len: usize, expected: usize },

    /// Label is empty or wider than an address
    #[error("Invalid address label: {0:?}")]
    InvalidLabel(String),
}
