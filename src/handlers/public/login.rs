// handlers/public/login.rs - POST /admin/login handler

use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{client_key, enforce_limit};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub user: AdminUserData,
}

#[derive(Debug, Serialize)]
pub struct AdminUserData {
    pub id: Uuid,
    pub email: String,
    #[serde(rename = "isSuperAdmin")]
    pub is_super_admin: bool,
}

/// POST /admin/login - authenticate an admin and receive a session token
///
/// Expected Input:
/// ```json
/// {
///   "email": "string",       // Required
///   "password": "string"     // Required
/// }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "user": { "id": "uuid", "email": "ops@fynda.io", "isSuperAdmin": false }
///   }
/// }
/// ```
///
/// Failures return 401 - both for bad credentials and for authenticated
/// identities that are not on the admin allow-list. Attempts are rate
/// limited per client key to blunt credential stuffing; past the budget the
/// response is 429 with `retryAfter`.
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginData> {
    let key = client_key(&headers, peer);
    enforce_limit(&state, &state.login_limiter, &key)?;

    let Json(request) = payload.map_err(|rejection| {
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let (email, password) = match (request.email, request.password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => return Err(ApiError::bad_request("email and password are required")),
    };

    let session = state
        .admin_auth
        .authenticate(&email, &password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiResponse::success(LoginData {
        token: session.token,
        user: AdminUserData {
            id: session.user_id,
            email: session.email,
            is_super_admin: session.is_super_admin,
        },
    }))
}
