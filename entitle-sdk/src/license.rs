//! The license entitlement record.
//!
//! A `License` binds an organization, product plan, instance and
//! subscription to a validity window. The wire format is a JSON object
//! with upper-camel field names; empty fields are omitted. Timestamps
//! are RFC 3339 in UTC.
//!
//! A license is immutable except through [`License::renew`], which
//! refreshes the validity window and bumps the version counter; the
//! identifier never changes across renewals.

use crate::error::{LicenseError, LicenseResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The entitlement record exchanged between issuer and relying party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Opaque unique identifier, assigned at creation.
    #[serde(rename = "ID", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// RFC 3339 UTC timestamp of issuance (or last renewal).
    #[serde(rename = "CreationTime", default, skip_serializing_if = "String::is_empty")]
    pub creation_time: String,

    /// RFC 3339 UTC timestamp after which the license is expired.
    #[serde(rename = "ExpirationTime", default, skip_serializing_if = "String::is_empty")]
    pub expiration_time: String,

    /// Free-form description.
    #[serde(rename = "Description", default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Instance binding; empty means unconstrained.
    #[serde(rename = "InstanceID", default, skip_serializing_if = "String::is_empty")]
    pub instance_id: String,

    /// Subscription binding; empty means unconstrained.
    #[serde(rename = "SubscriptionID", default, skip_serializing_if = "String::is_empty")]
    pub subscription_id: String,

    /// Product plan (SKU) binding; empty means unconstrained.
    #[serde(
        rename = "ProductPlanUniqueID",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub product_plan_id: String,

    /// Organization binding; empty means unconstrained.
    #[serde(rename = "OrganizationID", default, skip_serializing_if = "String::is_empty")]
    pub organization_id: String,

    /// Renewal counter, starting at 1.
    #[serde(rename = "Version", default, skip_serializing_if = "is_zero")]
    pub version: u64,
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

impl License {
    /// Creates a version-1 license with a fresh identifier.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        organization_id: &str,
        product_plan_id: &str,
        instance_id: &str,
        subscription_id: &str,
        description: &str,
        creation: DateTime<Utc>,
        expiration: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            creation_time: format_timestamp(creation),
            expiration_time: format_timestamp(expiration),
            description: description.to_string(),
            instance_id: instance_id.to_string(),
            subscription_id: subscription_id.to_string(),
            product_plan_id: product_plan_id.to_string(),
            organization_id: organization_id.to_string(),
            version: 1,
        }
    }

    /// Parses the creation timestamp.
    pub fn creation_time(&self) -> LicenseResult<DateTime<Utc>> {
        parse_timestamp("CreationTime", &self.creation_time)
    }

    /// Parses the expiration timestamp.
    pub fn expiration_time(&self) -> LicenseResult<DateTime<Utc>> {
        parse_timestamp("ExpirationTime", &self.expiration_time)
    }

    /// Checks the caller-supplied match fields against the license.
    ///
    /// Fields the query leaves unset (or empty) are wildcards and never
    /// mismatch. The first mismatching field is reported.
    pub fn matches(&self, query: &LicenseQuery) -> LicenseResult<()> {
        let checks: [(&'static str, Option<&str>, &str); 3] = [
            ("OrganizationID", query.organization_id(), &self.organization_id),
            ("ProductPlanUniqueID", query.product_plan_id(), &self.product_plan_id),
            ("InstanceID", query.instance_id(), &self.instance_id),
        ];
        for (field, wanted, found) in checks {
            if let Some(expected) = wanted {
                if expected != found {
                    return Err(LicenseError::FieldMismatch {
                        field,
                        expected: expected.to_string(),
                        found: found.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks required-field presence and timestamp parseability.
    pub fn check_well_formed(&self) -> LicenseResult<()> {
        if self.id.is_empty() || self.creation_time.is_empty() || self.expiration_time.is_empty()
        {
            return Err(LicenseError::MalformedLicense(
                "missing required fields".to_string(),
            ));
        }
        self.creation_time()?;
        self.expiration_time()?;
        Ok(())
    }

    /// Returns true if the license is expired at `at`.
    ///
    /// An unparseable expiration counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        match self.expiration_time() {
            Ok(expiration) => at > expiration,
            Err(_) => true,
        }
    }

    /// Renews the license: new creation time (now), new expiration,
    /// version bumped by one. The identifier is untouched.
    pub fn renew(&mut self, expiration: DateTime<Utc>) {
        self.creation_time = format_timestamp(Utc::now());
        self.expiration_time = format_timestamp(expiration);
        self.version += 1;
    }

    /// Serializes the license to its exact signed byte form.
    pub fn to_bytes(&self) -> LicenseResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserializes a license from JSON text.
    pub fn from_json_str(data: &str) -> LicenseResult<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

/// The set of match fields a relying party constrains a license by.
///
/// Each field is independently optional; an unset (or empty) field is a
/// wildcard. This keeps the validator contract open to schema
/// evolutions that collapse or extend the field set.
#[derive(Debug, Clone, Default)]
pub struct LicenseQuery {
    organization_id: Option<String>,
    product_plan_id: Option<String>,
    instance_id: Option<String>,
}

impl LicenseQuery {
    /// A query with no constraints: matches any license.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Constrains the organization.
    #[must_use]
    pub fn organization(mut self, id: impl Into<String>) -> Self {
        self.organization_id = Some(id.into());
        self
    }

    /// Constrains the product plan (SKU).
    #[must_use]
    pub fn product_plan(mut self, id: impl Into<String>) -> Self {
        self.product_plan_id = Some(id.into());
        self
    }

    /// Constrains the instance.
    #[must_use]
    pub fn instance(mut self, id: impl Into<String>) -> Self {
        self.instance_id = Some(id.into());
        self
    }

    fn organization_id(&self) -> Option<&str> {
        non_empty(self.organization_id.as_deref())
    }

    fn product_plan_id(&self) -> Option<&str> {
        non_empty(self.product_plan_id.as_deref())
    }

    fn instance_id(&self) -> Option<&str> {
        non_empty(self.instance_id.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Formats a timestamp in the fixed wire format: RFC 3339, UTC, second
/// precision, `Z` suffix.
#[must_use]
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(field: &str, value: &str) -> LicenseResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| LicenseError::MalformedLicense(format!("invalid {field}: {e}")))
}
