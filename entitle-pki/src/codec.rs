//! PEM decoding for certificates and private keys.
//!
//! Pure parsing: no I/O, no trust decisions. Certificates are held as
//! owned DER with the fields the rest of the crate needs extracted up
//! front, so accessors never re-parse and never fail.

use crate::error::{PkiError, PkiResult};
use chrono::{DateTime, Utc};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use x509_parser::prelude::*;

use crate::signing::SigningKey;

const CERTIFICATE_TAG: &str = "CERTIFICATE";
const PKCS1_KEY_TAG: &str = "RSA PRIVATE KEY";
const PKCS8_KEY_TAG: &str = "PRIVATE KEY";

/// An X.509 certificate, held as owned DER bytes.
///
/// Construction validates the DER and extracts subject, issuer, SAN DNS
/// names, the validity window and the CA flag; everything else is
/// re-parsed on demand from the raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
    subject: String,
    issuer: String,
    dns_names: Vec<String>,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    is_ca: bool,
}

impl Certificate {
    /// Parses a certificate from DER bytes, taking ownership of them.
    pub fn from_der(der: Vec<u8>) -> PkiResult<Self> {
        let (_, cert) = X509Certificate::from_der(&der)
            .map_err(|e| PkiError::Decode(format!("invalid certificate DER: {e}")))?;

        let subject = cert.subject().to_string();
        let issuer = cert.issuer().to_string();

        let dns_names = match cert.subject_alternative_name() {
            Ok(Some(san)) => san
                .value
                .general_names
                .iter()
                .filter_map(|name| match name {
                    GeneralName::DNSName(dns) => Some((*dns).to_string()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        let not_before = asn1_time_to_utc(cert.validity().not_before)?;
        let not_after = asn1_time_to_utc(cert.validity().not_after)?;

        let is_ca = cert
            .basic_constraints()
            .ok()
            .flatten()
            .map(|bc| bc.value.ca)
            .unwrap_or(false);

        Ok(Self {
            der,
            subject,
            issuer,
            dns_names,
            not_before,
            not_after,
            is_ca,
        })
    }

    /// Returns the raw DER bytes.
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Returns the subject distinguished name.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the issuer distinguished name.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the DNS names from the subject alternative name extension.
    #[must_use]
    pub fn dns_names(&self) -> &[String] {
        &self.dns_names
    }

    /// Returns the start of the validity window.
    #[must_use]
    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    /// Returns the end of the validity window.
    #[must_use]
    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    /// Returns true if the certificate carries the CA basic constraint.
    #[must_use]
    pub fn is_ca(&self) -> bool {
        self.is_ca
    }

    /// Returns true if the certificate is self-issued (subject == issuer).
    #[must_use]
    pub fn is_self_issued(&self) -> bool {
        self.subject == self.issuer
    }

    pub(crate) fn parse(&self) -> PkiResult<X509Certificate<'_>> {
        let (_, cert) = X509Certificate::from_der(&self.der)
            .map_err(|e| PkiError::Decode(format!("invalid certificate DER: {e}")))?;
        Ok(cert)
    }
}

impl std::fmt::Debug for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject)
            .field("issuer", &self.issuer)
            .field("not_after", &self.not_after)
            .finish_non_exhaustive()
    }
}

/// Decodes exactly one PEM `CERTIFICATE` block.
pub fn decode_certificate(data: &[u8]) -> PkiResult<Certificate> {
    let block =
        ::pem::parse(data).map_err(|e| PkiError::Decode(format!("invalid PEM: {e}")))?;
    if block.tag() != CERTIFICATE_TAG {
        return Err(PkiError::Decode(format!(
            "expected a CERTIFICATE block, found {:?}",
            block.tag()
        )));
    }
    Certificate::from_der(block.contents().to_vec())
}

/// Decodes every PEM `CERTIFICATE` block in the input, in order.
///
/// Blocks with other tags or with extra PEM headers are skipped. By
/// convention the leaf comes first in a bundle, but order is not enforced
/// here. Fails if no certificate block is found.
pub fn decode_certificate_chain(data: &[u8]) -> PkiResult<Vec<Certificate>> {
    let blocks =
        ::pem::parse_many(data).map_err(|e| PkiError::Decode(format!("invalid PEM: {e}")))?;

    let mut certs = Vec::new();
    for block in blocks {
        if block.tag() != CERTIFICATE_TAG || block.headers().iter().next().is_some() {
            continue;
        }
        certs.push(Certificate::from_der(block.contents().to_vec())?);
    }

    if certs.is_empty() {
        return Err(PkiError::Decode(
            "no certificates found in PEM data".to_string(),
        ));
    }
    Ok(certs)
}

/// Decodes exactly one PEM private key block (PKCS#1 or PKCS#8) into a
/// signing key.
pub fn decode_private_key(data: &[u8]) -> PkiResult<SigningKey> {
    let block =
        ::pem::parse(data).map_err(|e| PkiError::Decode(format!("invalid PEM: {e}")))?;

    let key = match block.tag() {
        PKCS1_KEY_TAG => RsaPrivateKey::from_pkcs1_der(block.contents())
            .map_err(|e| PkiError::Decode(format!("invalid PKCS#1 key: {e}")))?,
        PKCS8_KEY_TAG => RsaPrivateKey::from_pkcs8_der(block.contents())
            .map_err(|e| PkiError::Decode(format!("invalid PKCS#8 key: {e}")))?,
        other => {
            return Err(PkiError::Decode(format!(
                "expected a private key block, found {other:?}"
            )))
        }
    };

    Ok(SigningKey::new(key))
}

fn asn1_time_to_utc(t: ASN1Time) -> PkiResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(t.timestamp(), 0)
        .ok_or_else(|| PkiError::Decode("certificate validity time out of range".to_string()))
}
