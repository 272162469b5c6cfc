//! Tests for [`SignatureVerifier`] and [`WebhookSecret`].

use super::*;

// ============================================================================
// Helpers
// ============================================================================

fn secret(value: &str) -> WebhookSecret {
    WebhookSecret::new(value).unwrap()
}

/// Reference HMAC computed independently of the module under test.
fn reference_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

// ============================================================================
// verify tests
// ============================================================================

mod verify_tests {
    use super::*;

    #[test]
    fn test_no_secret_accepts_everything() {
        let verifier = SignatureVerifier::new(None);

        assert!(!verifier.is_enabled());
        assert!(verifier.verify(b"payload", None));
        assert!(verifier.verify(b"payload", Some("sha256=garbage")));
    }

    #[test]
    fn test_valid_signature_with_prefix_accepted() {
        let payload = b"hello world";
        let signature = reference_signature("my-test-secret", payload);

        let verifier = SignatureVerifier::new(Some(secret("my-test-secret")));
        assert!(verifier.verify(payload, Some(&signature)));
    }

    #[test]
    fn test_valid_signature_without_prefix_accepted() {
        let payload = b"hello world";
        let full = reference_signature("my-test-secret", payload);
        let bare = full.strip_prefix("sha256=").unwrap();

        let verifier = SignatureVerifier::new(Some(secret("my-test-secret")));
        assert!(verifier.verify(payload, Some(bare)));
    }

    #[test]
    fn test_upper_case_hex_accepted() {
        let payload = b"hello world";
        let full = reference_signature("my-test-secret", payload);
        let upper = format!("sha256={}", full["sha256=".len()..].to_ascii_uppercase());

        let verifier = SignatureVerifier::new(Some(secret("my-test-secret")));
        assert!(verifier.verify(payload, Some(&upper)));
    }

    #[test]
    fn test_missing_header_rejected_when_secret_configured() {
        let verifier = SignatureVerifier::new(Some(secret("s3cret")));
        assert!(!verifier.verify(b"{}", None));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = b"some payload";
        let signature = reference_signature("correct-secret", payload);

        let verifier = SignatureVerifier::new(Some(secret("wrong-secret")));
        assert!(!verifier.verify(payload, Some(&signature)));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let signature = reference_signature("s3cret", b"original payload");

        let verifier = SignatureVerifier::new(Some(secret("s3cret")));
        assert!(!verifier.verify(b"tampered payload", Some(&signature)));
    }

    #[test]
    fn test_truncated_signature_rejected() {
        let payload = b"payload";
        let signature = reference_signature("s3cret", payload);
        let truncated = &signature[..signature.len() - 2];

        let verifier = SignatureVerifier::new(Some(secret("s3cret")));
        assert!(!verifier.verify(payload, Some(truncated)));
    }

    #[test]
    fn test_non_hex_signature_rejected() {
        let verifier = SignatureVerifier::new(Some(secret("s3cret")));
        assert!(!verifier.verify(b"payload", Some("sha256=not-valid-hex!!")));
    }

    #[test]
    fn test_empty_payload_validates() {
        let signature = reference_signature("empty-payload-secret", b"");

        let verifier = SignatureVerifier::new(Some(secret("empty-payload-secret")));
        assert!(verifier.verify(b"", Some(&signature)));
    }
}

// ============================================================================
// compute_signature tests
// ============================================================================

#[test]
fn test_compute_signature_matches_reference() {
    let payload = br#"{"action":"opened"}"#;
    let computed = compute_signature(payload, &secret("abc")).unwrap();

    assert_eq!(computed, reference_signature("abc", payload));
    assert!(computed.starts_with("sha256="));
    assert_eq!(computed.len(), "sha256=".len() + 64);
}

// ============================================================================
// WebhookSecret tests
// ============================================================================

mod webhook_secret_tests {
    use super::*;

    #[test]
    fn test_empty_secret_rejected() {
        let result = WebhookSecret::new("");
        assert!(matches!(result, Err(ValidationError::Required { .. })));
    }

    #[test]
    fn test_debug_redacts_value() {
        let debug_str = format!("{:?}", secret("super-sensitive"));
        assert!(!debug_str.contains("super-sensitive"), "leaked: {debug_str}");
        assert!(debug_str.contains("REDACTED"));
    }

    #[test]
    fn test_deserialize_from_plain_string() {
        let parsed: WebhookSecret = serde_json::from_str("\"from-config\"").unwrap();
        assert_eq!(parsed.expose(), b"from-config");
    }

    #[test]
    fn test_deserialize_empty_string_fails() {
        let parsed: Result<WebhookSecret, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
    }
}
