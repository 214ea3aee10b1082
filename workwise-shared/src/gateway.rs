use std::sync::Arc;

use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::errors::{AppError, ErrorCode};
use crate::types::auth::{AuthUser, Claims};

/// Authenticates incoming requests and yields the caller's identity.
pub trait AccessGateway: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AppError>;
}

/// Application state that can hand out the access gateway to extractors.
pub trait AuthState {
    fn access_gateway(&self) -> &dyn AccessGateway;
}

impl<T: AuthState + ?Sized> AuthState for Arc<T> {
    fn access_gateway(&self) -> &dyn AccessGateway {
        (**self).access_gateway()
    }
}

/// HS256 bearer-token gateway.
#[derive(Clone)]
pub struct JwtGateway {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtGateway {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue an access token for `user_id` valid for `ttl_secs`.
    pub fn issue(&self, user_id: Uuid, ttl_secs: i64) -> Result<String, AppError> {
        let claims = Claims::new(user_id, ttl_secs);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("JWT encoding failed: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::new(ErrorCode::TokenExpired, "token has expired")
                }
                _ => AppError::new(ErrorCode::TokenInvalid, format!("invalid token: {e}")),
            })
    }
}

impl AccessGateway for JwtGateway {
    fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AppError> {
        let token = extract_bearer_token(headers)?;
        let claims = self.verify(token)?;
        Ok(AuthUser::from(claims))
    }
}

pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::new(ErrorCode::Unauthorized, "missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::new(ErrorCode::Unauthorized, "invalid authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::Unauthorized, "authorization header must use Bearer scheme"))
}
