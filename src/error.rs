//! use entcert::error::EntCertError;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EntCertError>;

/// Represents errors that can occur while reading entitlement certificates.
///
/// Structural failures (`MalformedIdentifier`, `UnsupportedVersion`, `InvalidFieldValue`)
/// abort a whole [`crate::factory::CertFactory::create`] call. `NotFound` is raised by
/// tree lookups and is turned into an absent field by the certificate builders.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntCertError {
    /// A dotted identifier or pattern could not be parsed.
    #[error("Malformed identifier: {0:?}")]
    MalformedIdentifier(String),

    /// The same identifier was supplied twice when building an extension tree.
    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    /// Segment index past the end of an identifier.
    #[error("Index {index} out of range for identifier of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Error due to invalid input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No entry at the requested identifier.
    #[error("No extension found at {0}")]
    NotFound(String),

    /// The certificate declares a format version this crate cannot read.
    #[error("Certificate version {0} is not yet supported")]
    UnsupportedVersion(String),

    /// A field holds a value outside its accepted set.
    #[error("Invalid value {value:?} for field {field}")]
    InvalidFieldValue { field: String, value: String },

    /// Error during certificate decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error during certificate encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Filesystem error while reading, writing or deleting a certificate.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl EntCertError {
    pub(crate) fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        EntCertError::InvalidFieldValue {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<der::Error> for EntCertError {
    /// Converts a `der::Error` into an `EntCertError`.
    fn from(err: der::Error) -> Self {
        EntCertError::DecodingError(err.to_string())
    }
}

impl From<pem::PemError> for EntCertError {
    fn from(err: pem::PemError) -> Self {
        EntCertError::DecodingError(err.to_string())
    }
}

impl From<std::io::Error> for EntCertError {
    fn from(err: std::io::Error) -> Self {
        EntCertError::IoError(err.to_string())
    }
}
