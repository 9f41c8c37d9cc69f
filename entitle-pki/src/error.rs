//! Error types for the PKI layer.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// PKI-specific errors.
#[derive(Debug, Error)]
pub enum PkiError {
    /// PEM or DER input could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Producing a signature failed inside the RSA primitive.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Signature verification failed (wrong key, tampered payload,
    /// tampered signature, or an unsupported key type).
    #[error("signature does not match payload")]
    SignatureMismatch,

    /// No path from the certificate to a trusted root could be built.
    #[error("certificate does not chain to a trusted root: {0}")]
    UntrustedChain(String),

    /// A certificate in the chain was expired at the verification time.
    #[error("certificate expired at {not_after}")]
    CertificateExpired {
        /// End of the certificate's validity window.
        not_after: DateTime<Utc>,
    },

    /// A certificate in the chain was not yet valid at the verification time.
    #[error("certificate not valid before {not_before}")]
    CertificateNotYetValid {
        /// Start of the certificate's validity window.
        not_before: DateTime<Utc>,
    },

    /// The leaf certificate does not cover the requested subject name.
    #[error("certificate does not cover subject name {name:?}")]
    NameMismatch {
        /// The DNS name that was requested.
        name: String,
    },
}

/// Result type for PKI operations.
pub type PkiResult<T> = Result<T, PkiError>;
