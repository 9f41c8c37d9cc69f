//! Certificate chain-of-trust verification.
//!
//! A leaf certificate is only as trustworthy as its path to a long-lived
//! trusted root: a self-signed "issuer" certificate with a matching key
//! pair must not be accepted at face value. Verification builds a path
//! from the leaf through the intermediate pool to any certificate in the
//! root pool, checking issuer signatures, validity windows at the
//! requested time, and the leaf's subject alternative names.
//!
//! Revocation (CRL/OCSP) is deliberately not checked.

use chrono::{DateTime, Utc};

use crate::anchors::TrustStore;
use crate::codec::Certificate;
use crate::error::{PkiError, PkiResult};

/// Bound on path length, to stop cycles in a malformed pool.
const MAX_CHAIN_DEPTH: usize = 8;

/// Verifies that `leaf` chains to a trusted root and is valid for
/// `subject_name` at time `at`.
///
/// The intermediate pool is the union of the store's fixed intermediates
/// and `extra_intermediates` (typically the rest of the issuer's
/// certificate bundle). Every certificate on the accepted path must have
/// a validity window covering `at`.
pub fn verify_chain(
    leaf: &Certificate,
    subject_name: &str,
    at: DateTime<Utc>,
    store: &TrustStore,
    extra_intermediates: &[Certificate],
) -> PkiResult<()> {
    check_validity_window(leaf, at)?;
    check_subject_name(leaf, subject_name)?;

    let pool: Vec<&Certificate> = store
        .intermediates()
        .iter()
        .chain(extra_intermediates.iter())
        .collect();

    let mut current = leaf;
    for _ in 0..MAX_CHAIN_DEPTH {
        if let Some(root) = store
            .roots()
            .iter()
            .find(|root| root.subject() == current.issuer() && signed_by(current, root))
        {
            check_validity_window(root, at)?;
            return Ok(());
        }

        let next = pool.iter().copied().find(|cand| {
            cand.subject() == current.issuer()
                && cand.der() != current.der()
                && cand.is_ca()
                && signed_by(current, cand)
        });
        match next {
            Some(issuer) => {
                check_validity_window(issuer, at)?;
                current = issuer;
            }
            None => break,
        }
    }

    Err(PkiError::UntrustedChain(format!(
        "no path from {:?} to a trusted root",
        leaf.subject()
    )))
}

fn check_validity_window(cert: &Certificate, at: DateTime<Utc>) -> PkiResult<()> {
    if at < cert.not_before() {
        return Err(PkiError::CertificateNotYetValid {
            not_before: cert.not_before(),
        });
    }
    if at > cert.not_after() {
        return Err(PkiError::CertificateExpired {
            not_after: cert.not_after(),
        });
    }
    Ok(())
}

fn check_subject_name(leaf: &Certificate, subject_name: &str) -> PkiResult<()> {
    let covered = leaf
        .dns_names()
        .iter()
        .any(|pattern| match_dns_name(pattern, subject_name));
    if covered {
        Ok(())
    } else {
        Err(PkiError::NameMismatch {
            name: subject_name.to_string(),
        })
    }
}

/// Returns true if `cert`'s signature verifies under `issuer`'s public key.
///
/// Parse failures count as "not the issuer" rather than hard errors, so a
/// single unusable pool entry cannot poison path building.
fn signed_by(cert: &Certificate, issuer: &Certificate) -> bool {
    let (Ok(cert), Ok(issuer)) = (cert.parse(), issuer.parse()) else {
        return false;
    };
    cert.verify_signature(Some(issuer.public_key())).is_ok()
}

/// DNS name matching: case-insensitive exact match, or a single-label
/// `*.` wildcard in the leftmost position.
fn match_dns_name(pattern: &str, name: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let name = name.to_ascii_lowercase();

    if let Some(suffix) = pattern.strip_prefix("*.") {
        match name.split_once('.') {
            Some((label, rest)) => !label.is_empty() && rest == suffix,
            None => false,
        }
    } else {
        pattern == name
    }
}
