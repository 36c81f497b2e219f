//! Client side of the waitlist pipeline: the closed submission error
//! taxonomy, the remote-insert seam, and the submission service that wires
//! validation, retry, and the form state machine together.

pub mod http;
pub mod submit;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{FieldErrors, NewWaitlistEntry};

/// Everything a submission can fail with. Matched exhaustively; only
/// `Network` and `Server` are worth retrying.
#[derive(Debug, Clone, Error)]
pub enum SubmitError {
    #[error("Please fix the highlighted fields")]
    Validation { field_errors: FieldErrors },

    #[error("This email is already registered")]
    Duplicate,

    #[error("Too many requests, try again in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Could not reach the server: {0}")]
    Network(String),

    #[error("The server had a problem: {0}")]
    Server(String),

    #[error("Not authorized: {0}")]
    Auth(String),

    #[error("Something went wrong, please try again")]
    Unknown,
}

impl SubmitError {
    /// Transient transport and server-side failures are retryable; validation,
    /// duplicates, rate limits, and auth failures are terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::Network(_) | SubmitError::Server(_))
    }
}

/// A waitlist entry as returned by the API after a successful insert.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub audience: String,
    pub industry: String,
    pub company_size: String,
    pub early_career_hires_per_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// The remote insert call. Production uses [`http::ApiClient`]; tests swap in
/// a scripted backend.
#[async_trait]
pub trait WaitlistBackend: Send + Sync {
    async fn insert(&self, entry: &NewWaitlistEntry) -> Result<SubmittedEntry, SubmitError>;
}

pub use http::ApiClient;
pub use submit::SubmissionService;
