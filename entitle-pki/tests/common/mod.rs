//! Shared fixtures: rcgen-minted certificate chains and RSA test keys.

#![allow(dead_code)]

use rcgen::{
    BasicConstraints, Certificate as IssuedCert, CertificateParams, DnType, IsCa, KeyPair,
    PKCS_RSA_SHA256,
};
use rsa::pkcs8::EncodePrivateKey;
use rsa::RsaPrivateKey;
use time::{Duration, OffsetDateTime};

/// A root -> intermediate -> leaf chain for a given DNS name.
pub struct TestChain {
    pub root_pem: String,
    pub intermediate_pem: String,
    pub leaf_pem: String,
}

/// Mints a fresh three-certificate chain. The leaf is valid for 90 days
/// around now and carries `dns_name` as its only SAN.
pub fn make_chain(dns_name: &str) -> TestChain {
    let root = ca_cert("Entitle Test Root", 3650);
    let intermediate = ca_cert("Entitle Test Intermediate", 365);
    let leaf = leaf_params(dns_name, 90);

    let root_cert = IssuedCert::from_params(root).unwrap();
    let intermediate_cert = IssuedCert::from_params(intermediate).unwrap();
    let leaf_cert = IssuedCert::from_params(leaf).unwrap();

    TestChain {
        root_pem: root_cert.serialize_pem().unwrap(),
        intermediate_pem: intermediate_cert
            .serialize_pem_with_signer(&root_cert)
            .unwrap(),
        leaf_pem: leaf_cert.serialize_pem_with_signer(&intermediate_cert).unwrap(),
    }
}

fn ca_cert(common_name: &str, valid_days: i64) -> CertificateParams {
    let mut params = CertificateParams::new(Vec::<String>::new());
    params.distinguished_name.push(DnType::CommonName, common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.not_before = OffsetDateTime::now_utc() - Duration::days(1);
    params.not_after = OffsetDateTime::now_utc() + Duration::days(valid_days);
    params
}

fn leaf_params(dns_name: &str, valid_days: i64) -> CertificateParams {
    let mut params = CertificateParams::new(vec![dns_name.to_string()]);
    params
        .distinguished_name
        .push(DnType::CommonName, "Entitle Test Leaf");
    params.not_before = OffsetDateTime::now_utc() - Duration::days(1);
    params.not_after = OffsetDateTime::now_utc() + Duration::days(valid_days);
    params
}

/// Generates a fresh 2048-bit RSA private key.
pub fn rsa_test_key() -> RsaPrivateKey {
    RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap()
}

/// Builds a self-signed RSA leaf certificate for `dns_name` over the
/// given key. Returns the certificate PEM.
pub fn rsa_leaf_pem(key: &RsaPrivateKey, dns_name: &str) -> String {
    let pkcs8 = key.to_pkcs8_der().unwrap();
    let mut params = leaf_params(dns_name, 90);
    params.alg = &PKCS_RSA_SHA256;
    params.key_pair = Some(KeyPair::try_from(pkcs8.as_bytes()).unwrap());
    IssuedCert::from_params(params).unwrap().serialize_pem().unwrap()
}
