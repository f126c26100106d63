//! Session token issue and verification (HS256, header.claims.signature).

use chrono::Utc;
use ring::hmac;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,
    #[error("Token encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// An issued token along with its expiry (unix seconds), the shape the login
/// response exposes.
#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub expiration_time: i64,
}

/// Sign a token for the given subject, valid for `ttl_secs` from now.
pub fn issue_token(secret: &str, sub: &str, ttl_secs: i64) -> Result<IssuedToken, AuthError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };

    let header = base64_url_encode(&serde_json::to_vec(&serde_json::json!({
        "alg": "HS256",
        "typ": "JWT"
    }))?);
    let payload = base64_url_encode(&serde_json::to_vec(&claims)?);
    let unsigned = format!("{header}.{payload}");

    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let tag = hmac::sign(&key, unsigned.as_bytes());

    Ok(IssuedToken {
        token: format!("{unsigned}.{}", base64_url_encode(tag.as_ref())),
        expiration_time: claims.exp,
    })
}

/// Verify a token's signature and expiry, returning its claims. Every failure
/// mode collapses to `InvalidToken` -- callers only need the yes/no.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let mut parts = token.splitn(3, '.');
    let (Some(header), Some(payload), Some(signature)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::InvalidToken);
    };

    let unsigned = format!("{header}.{payload}");
    let signature = base64_url_decode(signature).ok_or(AuthError::InvalidToken)?;

    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    hmac::verify(&key, unsigned.as_bytes(), &signature).map_err(|_| AuthError::InvalidToken)?;

    let claims_bytes = base64_url_decode(payload).ok_or(AuthError::InvalidToken)?;
    let claims: Claims =
        serde_json::from_slice(&claims_bytes).map_err(|_| AuthError::InvalidToken)?;

    if claims.exp <= Utc::now().timestamp() {
        return Err(AuthError::InvalidToken);
    }

    Ok(claims)
}

fn base64_url_encode(data: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(data)
}

fn base64_url_decode(data: &str) -> Option<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(data).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify() {
        let issued = issue_token("s3cret", "admin", 3600).unwrap();
        let claims = verify_token("s3cret", &issued.token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp, issued.expiration_time);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issued = issue_token("s3cret", "admin", 3600).unwrap();
        assert!(matches!(
            verify_token("other", &issued.token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let issued = issue_token("s3cret", "admin", 3600).unwrap();
        let mut parts: Vec<&str> = issued.token.split('.').collect();
        let forged = base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            br#"{"sub":"root","iat":0,"exp":99999999999}"#,
        );
        parts[1] = &forged;
        let token = parts.join(".");
        assert!(matches!(
            verify_token("s3cret", &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = issue_token("s3cret", "admin", -10).unwrap();
        assert!(matches!(
            verify_token("s3cret", &issued.token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            verify_token("s3cret", "not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
