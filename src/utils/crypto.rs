use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// `hex(sha256(secret || payload))`. Plain concatenation, not HMAC: this is
/// the scheme the subscribing systems already verify against.
pub fn sign_payload(secret: &str, payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_signature(payload: &str, signature: &str, secret: &str) -> bool {
    let expected = sign_payload(secret, payload);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

/// One-way hash under which API keys are stored and looked up.
pub fn hash_api_key(raw_key: &str) -> String {
    hex::encode(Sha256::digest(raw_key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_sha256_of_secret_then_body() {
        assert_eq!(
            sign_payload("s3cr3t", r#"{"a": 1}"#),
            "8f683c3ec3b047939c7acde84de9649f0de289c4a7bdee7576d3de85f93749d8"
        );
    }

    #[test]
    fn verify_accepts_only_exact_signature() {
        let body = r#"{"id": 7}"#;
        let sig = sign_payload("k", body);
        assert!(verify_signature(body, &sig, "k"));
        assert!(!verify_signature(body, &sig, "other"));
        assert!(!verify_signature(r#"{"id":7}"#, &sig, "k"));
        assert!(!verify_signature(body, "", "k"));
    }

    #[test]
    fn api_key_hash_is_hex_sha256() {
        assert_eq!(
            hash_api_key("test-key-123"),
            "625faa3fbbc3d2bd9d6ee7678d04cc5339cb33dc68d9b58451853d60046e226a"
        );
    }
}
