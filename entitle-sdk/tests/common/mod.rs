//! Shared fixtures: an RSA issuer with a matching self-signed
//! certificate, and canned issue requests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use entitle_sdk::{Generator, IssueRequest, Validator};
use rcgen::{Certificate as IssuedCert, CertificateParams, DnType, KeyPair, PKCS_RSA_SHA256};
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use time::OffsetDateTime;

pub const TEST_DOMAIN: &str = "licensing.example.test";

/// A generator/validator pair sharing one RSA key and certificate.
pub struct Issuer {
    pub generator: Generator,
    pub validator: Validator,
    pub cert_pem: String,
}

/// Mints a fresh RSA key, a self-signed certificate over it, and the
/// generator/validator pair built from them.
pub fn issuer() -> Issuer {
    let key = RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
    let key_pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();
    let cert_pem = self_signed_cert_pem(&key, TEST_DOMAIN);

    let generator = Generator::from_pem(key_pem.as_bytes(), cert_pem.as_bytes()).unwrap();
    let validator = Validator::from_pem(cert_pem.as_bytes()).unwrap();
    Issuer {
        generator,
        validator,
        cert_pem,
    }
}

/// Builds a self-signed RSA certificate for `dns_name`, valid 90 days.
pub fn self_signed_cert_pem(key: &RsaPrivateKey, dns_name: &str) -> String {
    let pkcs8 = key.to_pkcs8_der().unwrap();
    let mut params = CertificateParams::new(vec![dns_name.to_string()]);
    params
        .distinguished_name
        .push(DnType::CommonName, "Entitle Test Issuer");
    params.alg = &PKCS_RSA_SHA256;
    params.key_pair = Some(KeyPair::try_from(pkcs8.as_bytes()).unwrap());
    params.not_before = OffsetDateTime::now_utc() - time::Duration::days(1);
    params.not_after = OffsetDateTime::now_utc() + time::Duration::days(90);
    IssuedCert::from_params(params).unwrap().serialize_pem().unwrap()
}

/// The standard issue request used across scenarios.
pub fn request() -> IssueRequest {
    IssueRequest {
        organization_id: "org-1".to_string(),
        product_plan_id: "SKU-X".to_string(),
        instance_id: "inst-1".to_string(),
        subscription_id: "sub-1".to_string(),
        description: "test entitlement".to_string(),
    }
}

/// Expiration 48 hours from now.
pub fn in_48h() -> DateTime<Utc> {
    Utc::now() + Duration::hours(48)
}
