use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

type HmacSha512 = Hmac<Sha512>;

/// Verify an IPN callback: the signature header must be the lowercase hex
/// HMAC-SHA-512 of the raw request body under the shared secret. Comparison
/// happens inside the Mac to stay constant-time.
pub fn verify_ipn_signature(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Hex HMAC-SHA-512 of a body; what a well-behaved payment provider sends.
pub fn sign_ipn_body(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts any key length"));
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// SHA-256 hex digest of content being notarized on the public ledger.
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_body_verifies() {
        let body = br#"{"payment_status":"finished","order_id":"ord_1"}"#;
        let sig = sign_ipn_body("topsecret", body);
        assert!(verify_ipn_signature("topsecret", body, &sig));
    }

    #[test]
    fn mutated_body_fails_verification() {
        let body = br#"{"payment_status":"finished","order_id":"ord_1"}"#;
        let sig = sign_ipn_body("topsecret", body);
        let mut tampered = body.to_vec();
        tampered[10] ^= 1;
        assert!(!verify_ipn_signature("topsecret", &tampered, &sig));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let body = b"payload";
        let sig = sign_ipn_body("secret-a", body);
        assert!(!verify_ipn_signature("secret-b", body, &sig));
    }

    #[test]
    fn non_hex_signature_is_rejected() {
        assert!(!verify_ipn_signature("secret", b"payload", "not hex!"));
    }

    #[test]
    fn content_digest_is_stable_sha256() {
        // sha256("abc")
        assert_eq!(
            content_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(content_digest("abc"), content_digest("abd"));
    }
}
