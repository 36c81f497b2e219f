// handlers/protected/admin.rs - GET /admin/waitlist handler

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Extension;
use serde::Serialize;

use super::super::{client_key, enforce_limit};
use crate::database::WaitlistEntry;
use crate::domain::{redact_email, Audience};
use crate::error::ApiError;
use crate::middleware::{AdminUser, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WaitlistSummary {
    pub counts: AudienceCounts,
    pub recent: RecentEntries,
}

#[derive(Debug, Serialize)]
pub struct AudienceCounts {
    pub employer: i64,
    pub candidate: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct RecentEntries {
    pub employer: Vec<WaitlistEntry>,
    pub candidate: Vec<WaitlistEntry>,
}

/// GET /admin/waitlist - per-audience counts plus the most recent entries of
/// each waitlist. Requires a valid admin session (enforced by middleware)
/// and is rate limited per client key on top of that.
pub async fn waitlist_summary(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> ApiResult<WaitlistSummary> {
    let key = client_key(&headers, peer);
    enforce_limit(&state, &state.admin_read_limiter, &key)?;

    let limit = state.config.api.recent_entries_limit;
    let repository = &state.repository;

    let employer_count = repository.count(Audience::Employer).await.map_err(ApiError::from)?;
    let candidate_count = repository.count(Audience::Candidate).await.map_err(ApiError::from)?;
    let employer_recent = repository
        .recent(Audience::Employer, limit)
        .await
        .map_err(ApiError::from)?;
    let candidate_recent = repository
        .recent(Audience::Candidate, limit)
        .await
        .map_err(ApiError::from)?;

    tracing::debug!(admin = %redact_email(&admin.email), "admin waitlist summary read");

    Ok(ApiResponse::success(WaitlistSummary {
        counts: AudienceCounts {
            employer: employer_count,
            candidate: candidate_count,
            total: employer_count + candidate_count,
        },
        recent: RecentEntries {
            employer: employer_recent,
            candidate: candidate_recent,
        },
    }))
}
