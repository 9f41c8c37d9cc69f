//! The license envelope: a license plus the signature over its exact
//! serialized bytes.
//!
//! Envelopes serialize to JSON with a nested `License` object and a
//! base64 `Signature` string, and additionally support a
//! base64-of-JSON encoding for transport as one opaque token.

use crate::error::LicenseResult;
use crate::license::License;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A license bundled with its signature. The unit exchanged between
/// issuer and relying party; consumed read-only by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseEnvelope {
    /// Absent when decoded from a truncated or hand-built document;
    /// such envelopes are structurally invalid.
    #[serde(rename = "License")]
    license: Option<License>,

    #[serde(rename = "Signature", with = "signature_b64", default)]
    signature: Vec<u8>,
}

impl LicenseEnvelope {
    /// Pairs a license with its signature.
    #[must_use]
    pub fn new(license: License, signature: Vec<u8>) -> Self {
        Self {
            license: Some(license),
            signature,
        }
    }

    /// Returns the enclosed license, if present.
    #[must_use]
    pub fn license(&self) -> Option<&License> {
        self.license.as_ref()
    }

    /// Returns the signature bytes.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Structural validity: a license is present and the signature is
    /// non-empty. Necessary but not sufficient for trust; cryptographic
    /// and temporal checks are separate.
    #[must_use]
    pub fn is_structurally_valid(&self) -> bool {
        self.license.is_some() && !self.signature.is_empty()
    }

    /// Returns true if the envelope cannot be honored at `at`: either
    /// structurally invalid or carrying an expired license.
    #[must_use]
    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        match &self.license {
            Some(license) if !self.signature.is_empty() => license.is_expired_at(at),
            _ => true,
        }
    }

    /// Serializes the envelope to JSON bytes.
    pub fn to_bytes(&self) -> LicenseResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Serializes the envelope to JSON text.
    pub fn to_json(&self) -> LicenseResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encodes the envelope as base64-of-JSON for transport as a single
    /// opaque string.
    pub fn encode_base64(&self) -> LicenseResult<String> {
        Ok(BASE64.encode(self.to_bytes()?))
    }

    /// Decodes an envelope from JSON bytes.
    pub fn from_bytes(data: &[u8]) -> LicenseResult<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Decodes an envelope from JSON text.
    pub fn from_json_str(data: &str) -> LicenseResult<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Decodes an envelope from its base64-of-JSON encoding.
    pub fn decode_base64(data: &str) -> LicenseResult<Self> {
        let decoded = BASE64.decode(data.trim())?;
        Self::from_bytes(&decoded)
    }
}

/// Signature bytes travel as a standard-base64 string on the wire; a
/// missing or null value decodes to an empty (structurally invalid)
/// signature.
mod signature_b64 {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let value: Option<String> = Option::deserialize(deserializer)?;
        match value {
            None => Ok(Vec::new()),
            Some(encoded) => BASE64.decode(encoded).map_err(serde::de::Error::custom),
        }
    }
}
