// handlers/public/waitlist.rs - POST /waitlist handler

use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;

use super::super::{client_key, enforce_limit};
use crate::database::WaitlistEntry;
use crate::domain::{validate_request, WaitlistRequest};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /waitlist - validate and persist a signup
///
/// Expected Input:
/// ```json
/// {
///   "name": "string",                        // Required
///   "email": "string",                       // Required
///   "industry": "string",                    // Required, closed set
///   "company_size": "string",                // Required, closed set
///   "early_career_hires_per_year": 25,       // Optional, 0..=10000
///   "audience": "employer" | "candidate"     // Optional, default "employer"
/// }
/// ```
///
/// Responses: 200 with the stored entry, 400 with per-field errors, 409 when
/// the email is already on this audience's waitlist, 429 with `retryAfter`
/// when the client is over budget, 500/503 otherwise. Validation runs here
/// regardless of what any client already checked.
pub async fn submit(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<WaitlistRequest>, JsonRejection>,
) -> ApiResult<WaitlistEntry> {
    let key = client_key(&headers, peer);
    enforce_limit(&state, &state.waitlist_limiter, &key)?;

    let Json(request) = payload.map_err(|rejection| {
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let entry = validate_request(&request)
        .map_err(|field_errors| ApiError::validation("Please fix the highlighted fields", field_errors))?;

    let stored = state.repository.insert(&entry).await.map_err(ApiError::from)?;

    tracing::info!(
        id = %stored.id,
        email = %entry.email.redacted(),
        audience = %stored.audience,
        "waitlist entry created"
    );
    Ok(ApiResponse::success(stored))
}
