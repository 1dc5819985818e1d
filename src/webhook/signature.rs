// ============================================================================
// WEBHOOK SIGNATURES - HMAC-SHA256 over the raw request body
// ============================================================================

use hmac::{digest::InvalidLength, Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex encoded signature.
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Lowercase hex HMAC-SHA256 of `body` keyed by `secret`.
pub fn sign(secret: &[u8], body: &[u8]) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks `provided_hex` against the signature of `body`, in constant time.
/// A key the MAC refuses never verifies.
pub fn verify(secret: &[u8], body: &[u8], provided_hex: &str) -> bool {
    match sign(secret, body) {
        Ok(expected) => bool::from(expected.as_bytes().ct_eq(provided_hex.as_bytes())),
        Err(_) => false,
    }
}

/// Verifier bound to the configured shared secret.
///
/// Without a (non-empty) secret every request is rejected: an empty key still
/// yields a deterministic HMAC anyone can compute, so it never means "verification off".
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Option<Vec<u8>>,
}

impl SignatureVerifier {
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret: secret
                .filter(|s| !s.is_empty())
                .map(|s| s.as_bytes().to_vec()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// A missing signature is treated exactly like a wrong one.
    pub fn verify(&self, body: &[u8], provided: Option<&str>) -> bool {
        match (&self.secret, provided) {
            (Some(secret), Some(signature)) => verify(secret, body, signature),
            _ => false,
        }
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("configured", &self.is_configured())
            .finish()
    }
}
