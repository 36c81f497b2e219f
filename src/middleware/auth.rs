use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::auth::{decode_jwt, Claims};
use crate::config;
use crate::error::ApiError;

/// Authenticated admin context extracted from a session token.
#[derive(Clone, Debug)]
pub struct AdminUser {
    pub user_id: Uuid,
    pub email: String,
    pub is_super_admin: bool,
}

impl From<Claims> for AdminUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            is_super_admin: claims.is_super_admin,
        }
    }
}

/// Session middleware for the admin back-office: validates the bearer token
/// (signature and expiry) on every request and injects [`AdminUser`] into the
/// request extensions. The token is the only admin signal; there is no
/// client-trusted fallback.
pub async fn admin_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&headers)
        .map_err(|msg| ApiError::unauthorized(msg).into_response())?;

    let secret = &config::config().security.jwt_secret;
    let claims = decode_jwt(&token, secret)
        .map_err(|err| ApiError::unauthorized(err.to_string()).into_response())?;

    if !claims.admin {
        return Err(ApiError::unauthorized("not an admin").into_response());
    }

    request.extensions_mut().insert(AdminUser::from(claims));
    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer ...` header.
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
