//! File-based validation entry point.
//!
//! The one-call path for a deployed relying party: resolve file
//! locations (explicit options over environment over defaults), read the
//! certificate bundle and license file, verify the signing certificate's
//! chain of trust, then validate the license itself.

use crate::config::ValidatorConfig;
use crate::error::{LicenseError, LicenseResult};
use crate::license::LicenseQuery;
use crate::validator::Validator;
use chrono::{DateTime, Utc};
use std::fs;

/// The DNS name the production signing certificate is issued for.
pub const DEFAULT_CERTIFICATE_DOMAIN: &str = "licensing.entitle.dev";

/// Options for [`validate_license_with_options`]. Unset fields fall back
/// to environment configuration and built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// Skip chain-of-trust verification of the signing certificate.
    /// Intended for test harnesses with a non-production trust domain.
    pub skip_certificate_validation: bool,
    /// DNS name the signing certificate must cover; defaults to
    /// [`DEFAULT_CERTIFICATE_DOMAIN`].
    pub certificate_domain: String,
    /// Validation time; defaults to now (UTC).
    pub at: Option<DateTime<Utc>>,
    /// Certificate bundle path override.
    pub cert_path: String,
    /// License file path override.
    pub license_path: String,
    /// Organization the license must be bound to; empty skips the check.
    pub organization_id: String,
    /// Product plan (SKU) the license must be bound to; empty skips the
    /// check.
    pub product_plan_id: String,
    /// Instance the license must be bound to; empty falls back to the
    /// configured instance ID.
    pub instance_id: String,
}

/// Validates the deployment's license file for an organization and
/// product plan, using environment-resolved locations and the current
/// time.
pub fn validate_license(organization_id: &str, product_plan_id: &str) -> LicenseResult<()> {
    validate_license_with_options(ValidationOptions {
        organization_id: organization_id.to_string(),
        product_plan_id: product_plan_id.to_string(),
        ..ValidationOptions::default()
    })
}

/// Validates the deployment's license file with explicit options.
pub fn validate_license_with_options(options: ValidationOptions) -> LicenseResult<()> {
    let mut config = ValidatorConfig::from_env();
    if !options.cert_path.is_empty() {
        config.cert_path = options.cert_path.clone();
    }
    if !options.license_path.is_empty() {
        config.license_path = options.license_path.clone();
    }

    let license_bytes = fs::read(&config.license_path)?;
    if license_bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LicenseError::EnvelopeMissing);
    }

    let validator = Validator::from_config(&config)?;
    let at = options.at.unwrap_or_else(Utc::now);

    if !options.skip_certificate_validation {
        let domain = if options.certificate_domain.is_empty() {
            DEFAULT_CERTIFICATE_DOMAIN
        } else {
            &options.certificate_domain
        };
        validator.validate_certificate(domain, at)?;
    }

    let instance_id = if options.instance_id.is_empty() {
        config.instance_id.clone()
    } else {
        options.instance_id.clone()
    };

    let query = LicenseQuery::any()
        .organization(options.organization_id.clone())
        .product_plan(options.product_plan_id.clone())
        .instance(instance_id);

    validator.validate_bytes(&license_bytes, &query, at)
}
