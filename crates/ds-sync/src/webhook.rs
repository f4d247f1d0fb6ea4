//! Webhook signature verification (HMAC-SHA256 over the raw body).

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex signature, optionally prefixed with `sha256=`.
pub const SIGNATURE_HEADER: &str = "x-figma-signature";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing signature header")]
    Missing,
    #[error("signature is not valid hex")]
    Malformed,
    #[error("signature does not match")]
    Mismatch,
    #[error("webhook secret is unusable")]
    InvalidKey,
}

fn mac(secret: &[u8], body: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(body);
    Ok(mac)
}

/// Hex signature of `body` under `secret`.
pub fn sign(secret: &[u8], body: &[u8]) -> Result<String, SignatureError> {
    Ok(hex::encode(mac(secret, body)?.finalize().into_bytes()))
}

/// Check `header` against the body. Comparison is constant-time.
pub fn verify_signature(
    secret: &[u8],
    body: &[u8],
    header: Option<&str>,
) -> Result<(), SignatureError> {
    let header = header.map(str::trim).filter(|h| !h.is_empty()).ok_or(SignatureError::Missing)?;
    let hex_sig = header.strip_prefix("sha256=").unwrap_or(header);
    let expected = hex::decode(hex_sig).map_err(|_| SignatureError::Malformed)?;
    mac(secret, body)?
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"webhook-secret";
    const BODY: &[u8] = br#"{"event_type":"FILE_UPDATE","file_key":"abc123"}"#;

    #[test]
    fn known_vector() {
        // RFC 4231 test case 2.
        let sig = sign(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn accepts_plain_and_prefixed_signatures() {
        let sig = sign(SECRET, BODY).unwrap();
        assert_eq!(verify_signature(SECRET, BODY, Some(&sig)), Ok(()));
        let prefixed = format!("sha256={sig}");
        assert_eq!(verify_signature(SECRET, BODY, Some(&prefixed)), Ok(()));
    }

    #[test]
    fn rejects_tampered_body_and_wrong_secret() {
        let sig = sign(SECRET, BODY).unwrap();
        assert_eq!(
            verify_signature(SECRET, b"{}", Some(&sig)),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify_signature(b"other", BODY, Some(&sig)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_missing_and_malformed_headers() {
        assert_eq!(verify_signature(SECRET, BODY, None), Err(SignatureError::Missing));
        assert_eq!(verify_signature(SECRET, BODY, Some("  ")), Err(SignatureError::Missing));
        assert_eq!(
            verify_signature(SECRET, BODY, Some("sha256=zz")),
            Err(SignatureError::Malformed)
        );
        assert_eq!(
            verify_signature(SECRET, BODY, Some("abcd")),
            Err(SignatureError::Mismatch)
        );
    }
}
