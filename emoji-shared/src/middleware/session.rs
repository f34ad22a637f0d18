use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::errors::AppError;
use crate::types::auth::SessionClaims;

/// Cookie the identity provider stores its short-lived session JWT in.
pub const SESSION_COOKIE: &str = "__session";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no session token")]
    Missing,
    #[error("session has expired")]
    Expired,
    #[error("invalid session token: {0}")]
    Invalid(String),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::unauthorized(err.to_string())
    }
}

/// Verifies session tokens issued by the identity provider.
///
/// Production deployments use the provider's RS256 public key; HS256 with a
/// shared secret is accepted for local development.
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn from_rsa_pem(pem: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())?;
        Ok(Self::with_key(key, Algorithm::RS256))
    }

    pub fn from_secret(secret: &[u8]) -> Self {
        Self::with_key(DecodingKey::from_secret(secret), Algorithm::HS256)
    }

    fn with_key(key: DecodingKey, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        Self { key, validation }
    }

    /// Only accept tokens minted by this issuer (`iss` claim).
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let data = decode::<SessionClaims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid(e.to_string()),
            }
        })?;

        if data.claims.is_expired() {
            return Err(SessionError::Expired);
        }

        Ok(data.claims)
    }

    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<SessionClaims, SessionError> {
        let token = extract_session_token(headers).ok_or(SessionError::Missing)?;
        self.verify(&token)
    }
}

/// Session cookie first (browser), then `Authorization: Bearer` (API clients).
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty());

    if from_cookie.is_some() {
        return from_cookie;
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"test-secret";

    fn token_for(claims: &SessionClaims) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    #[test]
    fn verifies_a_fresh_token() {
        let verifier = SessionVerifier::from_secret(SECRET);
        let claims = verifier.verify(&token_for(&SessionClaims::new("user_123", 60))).unwrap();
        assert_eq!(claims.sub, "user_123");
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = SessionVerifier::from_secret(SECRET);
        let mut claims = SessionClaims::new("user_123", 60);
        claims.exp -= 7200;
        assert_eq!(verifier.verify(&token_for(&claims)), Err(SessionError::Expired));
    }

    #[test]
    fn rejects_token_signed_with_another_key() {
        let verifier = SessionVerifier::from_secret(b"other-secret");
        let result = verifier.verify(&token_for(&SessionClaims::new("user_123", 60)));
        assert!(matches!(result, Err(SessionError::Invalid(_))));
    }

    #[test]
    fn reads_token_from_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; __session=abc.def.ghi"));
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn falls_back_to_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_token_is_reported() {
        let verifier = SessionVerifier::from_secret(SECRET);
        assert_eq!(verifier.verify_headers(&HeaderMap::new()).unwrap_err(), SessionError::Missing);
    }
}
