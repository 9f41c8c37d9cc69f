//! Configuration resolution for key, certificate and license locations.
//!
//! Resolution order is explicit call-site values first, environment
//! variables second, built-in defaults last. Only this module reads the
//! environment; the core signing and validation types are handed
//! already-loaded bytes and resolved values.

use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable naming the issuer's private key file.
pub const LICENSE_KEY_PATH_ENV: &str = "ENTITLE_LICENSE_KEY_PATH";
/// Environment variable naming the certificate bundle file.
pub const LICENSE_CERT_PATH_ENV: &str = "ENTITLE_LICENSE_CERT_PATH";
/// Environment variable naming the license envelope file.
pub const LICENSE_FILE_PATH_ENV: &str = "ENTITLE_LICENSE_FILE_PATH";
/// Environment variable naming this deployment's instance ID.
pub const INSTANCE_ID_ENV: &str = "ENTITLE_INSTANCE_ID";

const DEFAULT_GENERATOR_CERT_PATH: &str = "/etc/entitle/tls.crt";
const DEFAULT_GENERATOR_KEY_PATH: &str = "/etc/entitle/tls.key";
const DEFAULT_VALIDATOR_CERT_PATH: &str = "/var/entitle/license.crt";
const DEFAULT_VALIDATOR_LICENSE_PATH: &str = "/var/entitle/license.lic";

/// Issuer-side file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Certificate bundle path.
    #[serde(rename = "certPath")]
    pub cert_path: String,
    /// Private key path.
    #[serde(rename = "keyPath")]
    pub key_path: String,
}

impl GeneratorConfig {
    /// Creates a configuration; empty values fall back to the built-in
    /// defaults.
    #[must_use]
    pub fn new(cert_path: &str, key_path: &str) -> Self {
        Self {
            cert_path: or_default(cert_path, DEFAULT_GENERATOR_CERT_PATH),
            key_path: or_default(key_path, DEFAULT_GENERATOR_KEY_PATH),
        }
    }

    /// Resolves a configuration from the environment, with defaults for
    /// anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            &env_or_empty(LICENSE_CERT_PATH_ENV),
            &env_or_empty(LICENSE_KEY_PATH_ENV),
        )
    }

    /// Returns true if both paths are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.cert_path.is_empty() && !self.key_path.is_empty()
    }
}

/// Relying-party-side file locations and instance identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Certificate bundle path.
    #[serde(rename = "certPath")]
    pub cert_path: String,
    /// License envelope file path.
    #[serde(rename = "licensePath")]
    pub license_path: String,
    /// This deployment's instance ID; empty means unconstrained.
    #[serde(rename = "instanceID")]
    pub instance_id: String,
}

impl ValidatorConfig {
    /// Creates a configuration; empty paths fall back to the built-in
    /// defaults. The instance ID has no default.
    #[must_use]
    pub fn new(instance_id: &str, cert_path: &str, license_path: &str) -> Self {
        Self {
            cert_path: or_default(cert_path, DEFAULT_VALIDATOR_CERT_PATH),
            license_path: or_default(license_path, DEFAULT_VALIDATOR_LICENSE_PATH),
            instance_id: instance_id.to_string(),
        }
    }

    /// Resolves a configuration from the environment, with defaults for
    /// anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            &env_or_empty(INSTANCE_ID_ENV),
            &env_or_empty(LICENSE_CERT_PATH_ENV),
            &env_or_empty(LICENSE_FILE_PATH_ENV),
        )
    }

    /// Returns true if both paths are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.cert_path.is_empty() && !self.license_path.is_empty()
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn env_or_empty(name: &str) -> String {
    env::var(name).unwrap_or_default()
}
