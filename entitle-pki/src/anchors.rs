//! Trust anchor store.
//!
//! Holds the root and intermediate certificate pools used for chain
//! verification. The production anchors (Let's Encrypt ISRG roots) are
//! compiled into the binary; the root set is never extended at runtime.
//! Intermediates can additionally be supplied per call from the issuer's
//! certificate bundle.

use crate::codec::{decode_certificate_chain, Certificate};
use crate::error::PkiResult;

const ISRG_ROOT_X1_PEM: &[u8] = include_bytes!("../certs/isrg-root-x1.pem");
const ISRG_ROOT_X2_PEM: &[u8] = include_bytes!("../certs/isrg-root-x2.pem");

/// A fixed set of trusted roots plus a fixed set of intermediates.
///
/// Read-only after construction; safe to share across threads.
#[derive(Debug, Clone)]
pub struct TrustStore {
    roots: Vec<Certificate>,
    intermediates: Vec<Certificate>,
}

impl TrustStore {
    /// Builds a store over explicit root and intermediate pools.
    ///
    /// Intended for alternative trust domains (test harnesses, private
    /// deployments); production callers use [`TrustStore::builtin`].
    #[must_use]
    pub fn new(roots: Vec<Certificate>, intermediates: Vec<Certificate>) -> Self {
        Self {
            roots,
            intermediates,
        }
    }

    /// Builds the store over the embedded production anchors
    /// (ISRG Root X1 and X2).
    ///
    /// The embedded intermediate pool is empty: issued certificate
    /// bundles carry their own intermediates, which callers pass to
    /// chain verification alongside this store.
    pub fn builtin() -> PkiResult<Self> {
        let mut roots = decode_certificate_chain(ISRG_ROOT_X1_PEM)?;
        roots.extend(decode_certificate_chain(ISRG_ROOT_X2_PEM)?);
        Ok(Self {
            roots,
            intermediates: Vec::new(),
        })
    }

    /// Returns the trusted root pool.
    #[must_use]
    pub fn roots(&self) -> &[Certificate] {
        &self.roots
    }

    /// Returns the fixed intermediate pool.
    #[must_use]
    pub fn intermediates(&self) -> &[Certificate] {
        &self.intermediates
    }
}
