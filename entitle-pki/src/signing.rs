//! Deterministic RSA signing and verification.
//!
//! Payloads are hashed with SHA-256 and the digest is signed with
//! RSA PKCS#1 v1.5. The padding scheme is deterministic: signing the
//! same payload with the same key always yields the same bytes, which
//! the licensing layer relies on.

use crate::codec::Certificate;
use crate::error::{PkiError, PkiResult};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

/// An RSA private key used to sign license payloads.
pub struct SigningKey {
    key: RsaPrivateKey,
}

impl SigningKey {
    /// Wraps an RSA private key.
    #[must_use]
    pub fn new(key: RsaPrivateKey) -> Self {
        Self { key }
    }

    /// Signs the SHA-256 digest of `payload` with PKCS#1 v1.5 padding.
    ///
    /// No randomness is involved; identical inputs produce identical
    /// signatures.
    pub fn sign(&self, payload: &[u8]) -> PkiResult<Vec<u8>> {
        let digest = Sha256::digest(payload);
        self.key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| PkiError::Signing(e.to_string()))
    }

    /// Returns the corresponding public key.
    #[must_use]
    pub fn public_key(&self) -> RsaPublicKey {
        self.key.to_public_key()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Verifies `signature` over `payload` against the certificate's RSA
/// public key.
///
/// The verdict is binary: any failure (wrong key, tampered payload,
/// tampered signature, non-RSA certificate key) is reported as
/// [`PkiError::SignatureMismatch`].
pub fn verify_signature(
    cert: &Certificate,
    signature: &[u8],
    payload: &[u8],
) -> PkiResult<()> {
    let public_key = rsa_public_key(cert)?;
    let digest = Sha256::digest(payload);
    public_key
        .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
        .map_err(|_| PkiError::SignatureMismatch)
}

fn rsa_public_key(cert: &Certificate) -> PkiResult<RsaPublicKey> {
    let parsed = cert.parse()?;
    let spki = parsed.public_key();
    // For RSA keys the SPKI bit string holds a PKCS#1 RSAPublicKey.
    RsaPublicKey::from_pkcs1_der(&spki.subject_public_key.data)
        .map_err(|_| PkiError::SignatureMismatch)
}
