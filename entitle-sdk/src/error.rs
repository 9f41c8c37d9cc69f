//! Error types for the licensing SDK.
//!
//! Every failure is a typed rejection; callers treat any returned error
//! as "do not honor this license". There is no warn-and-continue mode.

use entitle_pki::PkiError;
use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Wire input (JSON, base64, PEM) could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The component is missing the certificate it needs to operate.
    #[error("not configured: {0}")]
    NotConfigured(&'static str),

    /// The generator has no signing key.
    #[error("a signing key is required to issue a license")]
    KeyMissing,

    /// No license envelope was present where one is required.
    #[error("license envelope is missing")]
    EnvelopeMissing,

    /// The envelope is structurally invalid (no license, or empty
    /// signature).
    #[error("license envelope is invalid")]
    EnvelopeInvalid,

    /// A caller-supplied match field does not agree with the license.
    #[error("license {field} {found:?} does not match {expected:?}")]
    FieldMismatch {
        /// The wire name of the mismatched field.
        field: &'static str,
        /// The value the caller asked for.
        expected: String,
        /// The value the license carries.
        found: String,
    },

    /// Required license fields are missing or timestamps are unparseable.
    #[error("malformed license: {0}")]
    MalformedLicense(String),

    /// The license expiration time has passed.
    #[error("license expired at {expired_at}")]
    Expired {
        /// The license's expiration timestamp, as stored on the wire.
        expired_at: String,
    },

    /// The envelope signature does not verify over the license bytes.
    #[error("license signature does not match")]
    SignatureMismatch,

    /// Certificate decoding, signing or chain verification failed.
    #[error(transparent)]
    Pki(#[from] PkiError),

    /// Reading key, certificate or license files failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LicenseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(format!("invalid JSON: {err}"))
    }
}

impl From<base64::DecodeError> for LicenseError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(format!("invalid base64: {err}"))
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
