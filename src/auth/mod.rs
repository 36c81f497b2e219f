use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Claims carried by an admin session token. Expiry is checked on every
/// protected-route entry, not just at issue time.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub admin: bool,
    pub is_super_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, is_super_admin: bool, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            email,
            admin: true,
            is_super_admin,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate signature and expiry, returning the decoded claims.
pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_claims() {
        let id = Uuid::new_v4();
        let claims = Claims::new(id, "admin@fynda.io".into(), true, 24);
        let token = generate_jwt(&claims, "secret").unwrap();
        let decoded = decode_jwt(&token, "secret").unwrap();

        assert_eq!(decoded.sub, id);
        assert_eq!(decoded.email, "admin@fynda.io");
        assert!(decoded.admin);
        assert!(decoded.is_super_admin);
        // 24h session, within a minute of slack for test runtime.
        assert!((decoded.exp - decoded.iat - 24 * 3600).abs() < 60);
    }

    #[test]
    fn rejects_wrong_secret_and_garbage() {
        let claims = Claims::new(Uuid::new_v4(), "admin@fynda.io".into(), false, 24);
        let token = generate_jwt(&claims, "secret").unwrap();

        assert!(decode_jwt(&token, "other-secret").is_err());
        assert!(decode_jwt("not-a-token", "secret").is_err());
        assert!(matches!(generate_jwt(&claims, ""), Err(JwtError::InvalidSecret)));
    }
}
