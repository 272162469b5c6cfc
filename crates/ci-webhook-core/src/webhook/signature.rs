//! HMAC-SHA256 signature verification for GitHub webhook bodies.
//!
//! GitHub signs each delivery with the shared webhook secret and sends the
//! digest in `X-Hub-Signature-256` as `sha256=<hex>`. When no secret is
//! configured, verification is bypassed entirely; this is intended for local
//! and test setups only.

use crate::ValidationError;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, instrument, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

// ============================================================================
// WebhookSecret
// ============================================================================

/// Shared secret used to sign webhook deliveries.
///
/// The value is wiped from memory on drop and never appears in `Debug`
/// output. Empty secrets are rejected at construction and deserialization.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(try_from = "String")]
pub struct WebhookSecret(String);

impl WebhookSecret {
    /// Wrap a raw secret value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] when `value` is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Required {
                field: "webhooks.secret".to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Raw secret bytes, for keying the HMAC
    pub fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<String> for WebhookSecret {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("WebhookSecret").field(&"<REDACTED>").finish()
    }
}

// ============================================================================
// SignatureVerifier
// ============================================================================

/// Verifies webhook signatures against an optional shared secret.
///
/// The secret is injected once at construction and never changes, so a
/// single verifier can be shared across concurrent requests.
///
/// # Examples
///
/// ```rust
/// use ci_webhook_core::webhook::{compute_signature, SignatureVerifier, WebhookSecret};
///
/// let secret = WebhookSecret::new("my-secret").unwrap();
/// let body = br#"{"zen":"Keep it logically awesome."}"#;
/// let header = compute_signature(body, &secret).unwrap();
///
/// let verifier = SignatureVerifier::new(Some(secret));
/// assert!(verifier.verify(body, Some(&header)));
/// assert!(!verifier.verify(body, None));
/// ```
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: Option<WebhookSecret>,
}

impl SignatureVerifier {
    /// Create a verifier. `None` disables verification.
    pub fn new(secret: Option<WebhookSecret>) -> Self {
        if secret.is_none() {
            warn!(
                "No webhook secret configured; signature verification is DISABLED. \
                 Every delivery will be accepted."
            );
        }
        Self { secret }
    }

    /// Whether a secret is configured
    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Check `signature` against the HMAC-SHA256 of `body`.
    ///
    /// Returns `true` when no secret is configured. With a secret, a missing
    /// header or any mismatch returns `false`. The `sha256=` prefix is
    /// optional and hex case is ignored. The digest comparison runs in
    /// constant time.
    #[instrument(skip_all, fields(body_len = body.len(), has_signature = signature.is_some()))]
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> bool {
        let Some(secret) = &self.secret else {
            debug!("Signature verification skipped - no secret configured");
            return true;
        };

        let Some(signature) = signature else {
            warn!("Signature header missing while a webhook secret is configured");
            return false;
        };

        let expected = match hex_digest(body, secret) {
            Ok(digest) => digest,
            Err(e) => {
                warn!(error = %e, "Could not compute expected signature");
                return false;
            }
        };

        let provided = signature
            .strip_prefix(SIGNATURE_PREFIX)
            .unwrap_or(signature)
            .to_ascii_lowercase();

        if provided.len() != expected.len() {
            debug!("Signature length does not match expected digest length");
            return false;
        }

        let matches: bool = provided.as_bytes().ct_eq(expected.as_bytes()).into();
        if !matches {
            debug!("Signature digest mismatch");
        }
        matches
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Compute the `sha256=<hex>` header value GitHub would send for `body`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidFormat`] if the secret cannot key the HMAC.
pub fn compute_signature(body: &[u8], secret: &WebhookSecret) -> Result<String, ValidationError> {
    hex_digest(body, secret).map(|digest| format!("{SIGNATURE_PREFIX}{digest}"))
}

fn hex_digest(body: &[u8], secret: &WebhookSecret) -> Result<String, ValidationError> {
    let mut mac = HmacSha256::new_from_slice(secret.expose()).map_err(|_| {
        ValidationError::InvalidFormat {
            field: "secret".to_string(),
            message: "secret cannot be used as HMAC key".to_string(),
        }
    })?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
