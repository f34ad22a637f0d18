use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Claims carried by the identity provider's session token.
///
/// `sub` is the provider's stable user identifier (e.g. `user_2abc...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

impl SessionClaims {
    pub fn new(user_id: impl Into<String>, duration_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.into(),
            iat: now,
            exp: now + duration_secs,
            sid: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Identity attached to a request once the access gate has accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub session_id: Option<String>,
}

impl AuthUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            session_id: None,
        }
    }
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.sub,
            session_id: claims.sid,
        }
    }
}
