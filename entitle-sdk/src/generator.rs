//! Issuer-side license generation and renewal.
//!
//! The generator holds a signing key and the issuer's certificate
//! bundle. The bundle is opaque here: it is only re-exported to relying
//! parties, never parsed (parsing and trusting it is the validator's
//! job).

use crate::config::GeneratorConfig;
use crate::envelope::LicenseEnvelope;
use crate::error::{LicenseError, LicenseResult};
use crate::license::License;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use entitle_pki::{decode_private_key, SigningKey};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Identity bindings for a license to be issued. Empty fields are left
/// unconstrained in the resulting license.
#[derive(Debug, Clone, Default)]
pub struct IssueRequest {
    /// Organization the license is bound to.
    pub organization_id: String,
    /// Product plan (SKU) the license is bound to.
    pub product_plan_id: String,
    /// Instance the license is bound to.
    pub instance_id: String,
    /// Subscription the license is bound to.
    pub subscription_id: String,
    /// Free-form description.
    pub description: String,
}

/// Mints and renews signed license envelopes.
///
/// Immutable after construction; safe to share across threads.
#[derive(Debug)]
pub struct Generator {
    key: Option<SigningKey>,
    cert_pem: Vec<u8>,
}

impl Generator {
    /// Builds a generator from an already-decoded key and a certificate
    /// bundle blob.
    #[must_use]
    pub fn new(key: SigningKey, cert_pem: Vec<u8>) -> Self {
        Self {
            key: Some(key),
            cert_pem,
        }
    }

    /// Builds a generator that can only re-export its certificate.
    /// Issuing or renewing fails with [`LicenseError::KeyMissing`].
    #[must_use]
    pub fn with_certificate_only(cert_pem: Vec<u8>) -> Self {
        Self {
            key: None,
            cert_pem,
        }
    }

    /// Builds a generator from PEM-encoded key and certificate bytes.
    pub fn from_pem(key_pem: &[u8], cert_pem: &[u8]) -> LicenseResult<Self> {
        let key = decode_private_key(key_pem)?;
        Ok(Self::new(key, cert_pem.to_vec()))
    }

    /// Builds a generator by reading key and certificate files.
    pub fn from_files(
        key_path: impl AsRef<Path>,
        cert_path: impl AsRef<Path>,
    ) -> LicenseResult<Self> {
        let key_pem = fs::read(key_path)?;
        let cert_pem = fs::read(cert_path)?;
        Self::from_pem(&key_pem, &cert_pem)
    }

    /// Builds a generator from a resolved configuration.
    pub fn from_config(config: &GeneratorConfig) -> LicenseResult<Self> {
        Self::from_files(&config.key_path, &config.cert_path)
    }

    /// Builds a generator from environment-resolved configuration.
    pub fn from_env() -> LicenseResult<Self> {
        Self::from_config(&GeneratorConfig::from_env())
    }

    /// Issues a new license expiring at `expiration`, signed over its
    /// exact serialized bytes.
    pub fn generate(
        &self,
        request: &IssueRequest,
        expiration: DateTime<Utc>,
    ) -> LicenseResult<LicenseEnvelope> {
        let key = self.key.as_ref().ok_or(LicenseError::KeyMissing)?;

        let license = License::new(
            &request.organization_id,
            &request.product_plan_id,
            &request.instance_id,
            &request.subscription_id,
            &request.description,
            Utc::now(),
            expiration,
        );
        let envelope = sign_license(key, license)?;
        debug!(
            license_id = %envelope.license().map(|l| l.id.as_str()).unwrap_or_default(),
            %expiration,
            "issued license"
        );
        Ok(envelope)
    }

    /// Issues a new license and returns it in base64-of-JSON form.
    pub fn generate_base64(
        &self,
        request: &IssueRequest,
        expiration: DateTime<Utc>,
    ) -> LicenseResult<String> {
        self.generate(request, expiration)?.encode_base64()
    }

    /// Renews the license in `envelope`: same identifier, fresh creation
    /// time, new expiration, version bumped by one, re-signed.
    ///
    /// The input envelope is never mutated; a new envelope is returned.
    pub fn renew(
        &self,
        envelope: &LicenseEnvelope,
        expiration: DateTime<Utc>,
    ) -> LicenseResult<LicenseEnvelope> {
        let key = self.key.as_ref().ok_or(LicenseError::KeyMissing)?;
        if !envelope.is_structurally_valid() {
            return Err(LicenseError::EnvelopeInvalid);
        }
        let Some(license) = envelope.license() else {
            return Err(LicenseError::EnvelopeInvalid);
        };

        let mut renewed = license.clone();
        renewed.renew(expiration);
        let envelope = sign_license(key, renewed)?;
        debug!(
            license_id = %envelope.license().map(|l| l.id.as_str()).unwrap_or_default(),
            %expiration,
            "renewed license"
        );
        Ok(envelope)
    }

    /// Renews a base64-encoded envelope, returning the renewed envelope
    /// in the same encoding.
    pub fn renew_base64(
        &self,
        envelope_base64: &str,
        expiration: DateTime<Utc>,
    ) -> LicenseResult<String> {
        let envelope = LicenseEnvelope::decode_base64(envelope_base64)?;
        self.renew(&envelope, expiration)?.encode_base64()
    }

    /// Re-exports the held certificate bundle, base64-encoded. No
    /// parsing or validation happens here.
    #[must_use]
    pub fn public_certificate_base64(&self) -> String {
        BASE64.encode(&self.cert_pem)
    }
}

fn sign_license(key: &SigningKey, license: License) -> LicenseResult<LicenseEnvelope> {
    let payload = license.to_bytes()?;
    let signature = key.sign(&payload)?;
    Ok(LicenseEnvelope::new(license, signature))
}
