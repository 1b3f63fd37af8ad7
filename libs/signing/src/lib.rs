//! Webhook signature primitives for the Comapi/Meya bridge.
//!
//! Two HMAC-SHA1 variants are in play, one per direction:
//! - the chat platform signs the exact raw request body and sends the digest
//!   as lowercase hex;
//! - the bot platform signs the full request URL concatenated with the
//!   canonical JSON form of the body and sends the digest as Base64.
//!
//! Verification never reveals which check failed; callers map any mismatch to
//! a single unauthenticated status.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha1::Sha1;

mod canonical;

pub use canonical::canonical_json;

type HmacSha1 = Hmac<Sha1>;

/// Signs raw body bytes with the shared webhook secret, returning lowercase
/// hex.
pub fn sign_raw(secret: &str, body: &[u8]) -> String {
    hex::encode(digest(secret, body))
}

/// Checks a raw-body signature header against the shared webhook secret.
pub fn verify_raw(secret: &str, body: &[u8], signature: &str) -> bool {
    constant_time_eq(&sign_raw(secret, body), signature)
}

/// Signs `url + canonical_json(body)` with the platform API key, returning
/// Base64.
pub fn sign_canonical(key: &str, url: &str, body: &Value) -> String {
    let mut input = String::from(url);
    input.push_str(&canonical_json(body));
    B64.encode(digest(key, input.as_bytes()))
}

/// Checks a canonical-URL+JSON signature header against the platform API key.
pub fn verify_canonical(key: &str, url: &str, body: &Value, signature: &str) -> bool {
    constant_time_eq(&sign_canonical(key, url, body), signature)
}

fn digest(secret: &str, message: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_signature_round_trips() {
        let secret = "webhook-secret";
        let body = br#"{"name":"chatMessage.sent"}"#;
        let signature = sign_raw(secret, body);
        assert!(verify_raw(secret, body, &signature));
    }

    #[test]
    fn raw_signature_is_lowercase_hex() {
        let signature = sign_raw("secret", b"payload");
        assert_eq!(signature.len(), 40);
        assert!(
            signature
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn flipping_any_body_byte_invalidates() {
        let secret = "webhook-secret";
        let body = b"{\"ok\":true}".to_vec();
        let signature = sign_raw(secret, &body);
        for i in 0..body.len() {
            let mut tampered = body.clone();
            tampered[i] ^= 0x01;
            assert!(!verify_raw(secret, &tampered, &signature), "byte {i}");
        }
    }

    #[test]
    fn wrong_secret_fails() {
        let body = b"payload";
        let signature = sign_raw("right", body);
        assert!(!verify_raw("wrong", body, &signature));
    }

    #[test]
    fn canonical_signature_ignores_key_order() {
        let key = "meya-key";
        let url = "https://bridge.example.com/botOutbound";
        let a = json!({"sender": "bot", "type": "text", "text": "hi"});
        let b = json!({"text": "hi", "type": "text", "sender": "bot"});
        assert_eq!(sign_canonical(key, url, &a), sign_canonical(key, url, &b));
        let signature = sign_canonical(key, url, &a);
        assert!(verify_canonical(key, url, &b, &signature));
    }

    #[test]
    fn canonical_signature_binds_the_url() {
        let key = "meya-key";
        let body = json!({"sender": "bot"});
        let signature = sign_canonical(key, "https://a.example.com/botOutbound", &body);
        assert!(!verify_canonical(
            key,
            "https://b.example.com/botOutbound",
            &body,
            &signature
        ));
    }

    #[test]
    fn canonical_signature_is_base64() {
        let signature = sign_canonical("key", "https://example.com", &json!({}));
        assert!(B64.decode(&signature).is_ok());
    }

    #[test]
    fn mismatched_lengths_fail_fast() {
        assert!(!verify_raw("secret", b"body", "deadbeef"));
    }
}
