//! Relying-party license validation.
//!
//! The validator holds the issuer's leaf certificate, the intermediates
//! found alongside it in the bundle, and a trust anchor store. License
//! validation is a linear, short-circuiting sequence of checks; the
//! first failure is returned as its specific typed error. Certificate
//! chain validation is a separate, independent operation — callers
//! decide whether to require it.

use crate::config::ValidatorConfig;
use crate::envelope::LicenseEnvelope;
use crate::error::{LicenseError, LicenseResult};
use crate::license::LicenseQuery;
use chrono::{DateTime, Utc};
use entitle_pki::{
    decode_certificate_chain, verify_chain, verify_signature, Certificate, TrustStore,
};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Validates signed license envelopes against a configured signing
/// certificate.
///
/// Immutable after construction; safe to share across threads.
#[derive(Debug)]
pub struct Validator {
    cert: Option<Certificate>,
    intermediates: Vec<Certificate>,
    trust: TrustStore,
}

impl Validator {
    /// Builds a validator over a leaf certificate and any intermediates
    /// shipped with it, anchored to the builtin trust store.
    pub fn new(cert: Certificate, intermediates: Vec<Certificate>) -> LicenseResult<Self> {
        Ok(Self {
            cert: Some(cert),
            intermediates,
            trust: TrustStore::builtin()?,
        })
    }

    /// Builds a validator anchored to an explicit trust store
    /// (alternative trust domains, test harnesses).
    #[must_use]
    pub fn with_trust_store(
        cert: Certificate,
        intermediates: Vec<Certificate>,
        trust: TrustStore,
    ) -> Self {
        Self {
            cert: Some(cert),
            intermediates,
            trust,
        }
    }

    /// A validator with no signing certificate configured. Every
    /// validation fails with [`LicenseError::NotConfigured`]; useful as
    /// a placeholder while license material is being provisioned.
    pub fn unconfigured() -> LicenseResult<Self> {
        Ok(Self {
            cert: None,
            intermediates: Vec::new(),
            trust: TrustStore::builtin()?,
        })
    }

    /// Builds a validator from a PEM certificate bundle: the first
    /// certificate is the leaf, the rest are intermediates.
    pub fn from_pem(cert_pem: &[u8]) -> LicenseResult<Self> {
        let mut certs = decode_certificate_chain(cert_pem)?;
        let leaf = certs.remove(0);
        Self::new(leaf, certs)
    }

    /// Builds a validator by reading a PEM certificate bundle file.
    pub fn from_file(cert_path: impl AsRef<Path>) -> LicenseResult<Self> {
        let cert_pem = fs::read(cert_path)?;
        Self::from_pem(&cert_pem)
    }

    /// Builds a validator from a resolved configuration.
    pub fn from_config(config: &ValidatorConfig) -> LicenseResult<Self> {
        Self::from_file(&config.cert_path)
    }

    /// Validates a license envelope at time `at` against the query's
    /// match fields.
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// configured certificate, envelope structure, field matching,
    /// well-formedness, expiry, signature.
    pub fn validate(
        &self,
        envelope: &LicenseEnvelope,
        query: &LicenseQuery,
        at: DateTime<Utc>,
    ) -> LicenseResult<()> {
        let result = self.validate_inner(envelope, query, at);
        if let Err(err) = &result {
            warn!(error = %err, "license validation failed");
        }
        result
    }

    fn validate_inner(
        &self,
        envelope: &LicenseEnvelope,
        query: &LicenseQuery,
        at: DateTime<Utc>,
    ) -> LicenseResult<()> {
        let cert = self
            .cert
            .as_ref()
            .ok_or(LicenseError::NotConfigured("signing certificate"))?;

        let license = match envelope.license() {
            Some(license) if !envelope.signature().is_empty() => license,
            _ => return Err(LicenseError::EnvelopeInvalid),
        };

        license.matches(query)?;
        license.check_well_formed()?;

        if license.is_expired_at(at) {
            return Err(LicenseError::Expired {
                expired_at: license.expiration_time.clone(),
            });
        }

        let payload = license.to_bytes()?;
        verify_signature(cert, envelope.signature(), &payload)
            .map_err(|_| LicenseError::SignatureMismatch)
    }

    /// Decodes an envelope from JSON bytes, then validates it.
    pub fn validate_bytes(
        &self,
        data: &[u8],
        query: &LicenseQuery,
        at: DateTime<Utc>,
    ) -> LicenseResult<()> {
        let envelope = LicenseEnvelope::from_bytes(data)?;
        self.validate(&envelope, query, at)
    }

    /// Decodes an envelope from JSON text, then validates it.
    pub fn validate_json(
        &self,
        data: &str,
        query: &LicenseQuery,
        at: DateTime<Utc>,
    ) -> LicenseResult<()> {
        let envelope = LicenseEnvelope::from_json_str(data)?;
        self.validate(&envelope, query, at)
    }

    /// Decodes an envelope from its base64-of-JSON encoding, then
    /// validates it.
    pub fn validate_base64(
        &self,
        data: &str,
        query: &LicenseQuery,
        at: DateTime<Utc>,
    ) -> LicenseResult<()> {
        let envelope = LicenseEnvelope::decode_base64(data)?;
        self.validate(&envelope, query, at)
    }

    /// Verifies the configured signing certificate chains to a trusted
    /// root and covers `subject_name` at time `at`.
    ///
    /// Independent of license validation: callers in non-production
    /// trust domains may skip it.
    pub fn validate_certificate(
        &self,
        subject_name: &str,
        at: DateTime<Utc>,
    ) -> LicenseResult<()> {
        let cert = self
            .cert
            .as_ref()
            .ok_or(LicenseError::NotConfigured("signing certificate"))?;
        verify_chain(cert, subject_name, at, &self.trust, &self.intermediates)?;
        Ok(())
    }
}
