//! Certificate trust chain and signing primitives for Entitle licensing.
//!
//! This crate is the trust boundary of the SDK:
//! - PEM decoding of certificates, certificate bundles and private keys
//! - Deterministic RSA-PKCS#1v1.5/SHA-256 signing and verification
//! - Chain-of-trust verification against embedded root anchors
//!
//! It performs no I/O: callers hand it already-loaded bytes. All
//! operations are synchronous and side-effect-free, and every type here
//! is immutable after construction and safe to share across threads.

mod anchors;
mod chain;
mod codec;
mod error;
mod signing;

pub use anchors::TrustStore;
pub use chain::verify_chain;
pub use codec::{decode_certificate, decode_certificate_chain, decode_private_key, Certificate};
pub use error::{PkiError, PkiResult};
pub use signing::{verify_signature, SigningKey};
