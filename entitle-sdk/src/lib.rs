//! Signed, certificate-anchored license entitlements.
//!
//! This crate handles:
//! - Issuing signed license envelopes bound to an organization, product
//!   plan, instance and subscription (generator side)
//! - Validating envelopes against the issuer's certificate, with chain
//!   verification back to embedded trust anchors (relying-party side)
//! - Renewal that extends a license without reissuing its identity
//!
//! # Design Principles
//!
//! - **No shared secret**: relying parties hold only the issuer's public
//!   certificate bundle and the compiled-in roots
//! - **Offline verification**: no network calls anywhere in the
//!   validation path
//! - **Typed rejection**: every failing check returns its own error;
//!   any error means "do not honor this license"
//!
//! # Wire Format
//!
//! A license serializes to JSON with upper-camel field names; the
//! envelope wraps it with a base64 `Signature` over the exact license
//! bytes, and the whole envelope can travel as base64-of-JSON.

mod config;
mod envelope;
mod error;
mod generator;
mod license;
mod validate;
mod validator;

pub use config::{
    GeneratorConfig, ValidatorConfig, INSTANCE_ID_ENV, LICENSE_CERT_PATH_ENV,
    LICENSE_FILE_PATH_ENV, LICENSE_KEY_PATH_ENV,
};
pub use envelope::LicenseEnvelope;
pub use error::{LicenseError, LicenseResult};
pub use generator::{Generator, IssueRequest};
pub use license::{format_timestamp, License, LicenseQuery};
pub use validate::{
    validate_license, validate_license_with_options, ValidationOptions,
    DEFAULT_CERTIFICATE_DOMAIN,
};
pub use validator::Validator;
