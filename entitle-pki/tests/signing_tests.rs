mod common;

use common::{make_chain, rsa_leaf_pem, rsa_test_key};
use entitle_pki::{decode_certificate, verify_signature, PkiError, SigningKey};

// ── Determinism ──────────────────────────────────────────────────

#[test]
fn signing_is_deterministic() {
    let key = SigningKey::new(rsa_test_key());

    let first = key.sign(b"payload").unwrap();
    let second = key.sign(b"payload").unwrap();
    assert_eq!(first, second);
}

#[test]
fn different_payloads_give_different_signatures() {
    let key = SigningKey::new(rsa_test_key());

    let a = key.sign(b"payload-a").unwrap();
    let b = key.sign(b"payload-b").unwrap();
    assert_ne!(a, b);
}

// ── Verification ─────────────────────────────────────────────────

#[test]
fn verify_accepts_valid_signature() {
    let rsa_key = rsa_test_key();
    let cert = decode_certificate(rsa_leaf_pem(&rsa_key, "licensing.example.test").as_bytes())
        .unwrap();
    let key = SigningKey::new(rsa_key);

    let signature = key.sign(b"payload").unwrap();
    verify_signature(&cert, &signature, b"payload").unwrap();
}

#[test]
fn verify_rejects_tampered_payload() {
    let rsa_key = rsa_test_key();
    let cert = decode_certificate(rsa_leaf_pem(&rsa_key, "licensing.example.test").as_bytes())
        .unwrap();
    let key = SigningKey::new(rsa_key);

    let signature = key.sign(b"payload").unwrap();
    let err = verify_signature(&cert, &signature, b"payload ").unwrap_err();
    assert!(matches!(err, PkiError::SignatureMismatch));
}

#[test]
fn verify_rejects_tampered_signature() {
    let rsa_key = rsa_test_key();
    let cert = decode_certificate(rsa_leaf_pem(&rsa_key, "licensing.example.test").as_bytes())
        .unwrap();
    let key = SigningKey::new(rsa_key);

    let mut signature = key.sign(b"payload").unwrap();
    signature[0] ^= 0x01;
    let err = verify_signature(&cert, &signature, b"payload").unwrap_err();
    assert!(matches!(err, PkiError::SignatureMismatch));
}

#[test]
fn verify_rejects_signature_from_other_key() {
    let signer = SigningKey::new(rsa_test_key());
    let other_key = rsa_test_key();
    let cert = decode_certificate(rsa_leaf_pem(&other_key, "licensing.example.test").as_bytes())
        .unwrap();

    let signature = signer.sign(b"payload").unwrap();
    let err = verify_signature(&cert, &signature, b"payload").unwrap_err();
    assert!(matches!(err, PkiError::SignatureMismatch));
}

#[test]
fn verify_rejects_non_rsa_certificate() {
    // The default test chain uses ECDSA keys; the fixed scheme is RSA.
    let chain = make_chain("licensing.example.test");
    let cert = decode_certificate(chain.leaf_pem.as_bytes()).unwrap();
    let key = SigningKey::new(rsa_test_key());

    let signature = key.sign(b"payload").unwrap();
    let err = verify_signature(&cert, &signature, b"payload").unwrap_err();
    assert!(matches!(err, PkiError::SignatureMismatch));
}

#[test]
fn empty_payload_round_trips() {
    let rsa_key = rsa_test_key();
    let cert = decode_certificate(rsa_leaf_pem(&rsa_key, "licensing.example.test").as_bytes())
        .unwrap();
    let key = SigningKey::new(rsa_key);

    let signature = key.sign(b"").unwrap();
    verify_signature(&cert, &signature, b"").unwrap();
}

#[test]
fn debug_redacts_key_material() {
    let key = SigningKey::new(rsa_test_key());
    let rendered = format!("{key:?}");
    assert!(rendered.contains("REDACTED"));
}
