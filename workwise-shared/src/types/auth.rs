use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

impl Claims {
    pub fn new(user_id: Uuid, duration_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            iat: now,
            exp: now + duration_secs,
            jti: Uuid::now_v7(),
        }
    }
}

/// The caller of a request, as established by the access gateway.
///
/// Handlers treat `id` as ground truth for ownership; it never comes from a
/// request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

impl AuthUser {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self::new(claims.sub)
    }
}
