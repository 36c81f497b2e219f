use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{SubmitError, SubmittedEntry, WaitlistBackend};
use crate::domain::NewWaitlistEntry;

/// HTTP client for the Fynda API. One instance per base URL; the inner
/// reqwest client pools connections.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Admin session as returned by POST /admin/login.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSession {
    pub token: String,
    pub user: AdminUserInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminUserInfo {
    pub id: Uuid,
    pub email: String,
    #[serde(rename = "isSuperAdmin")]
    pub is_super_admin: bool,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /health - liveness and database reachability.
    pub async fn health(&self) -> Result<Value, SubmitError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;
        response.json().await.map_err(transport_error)
    }

    /// POST /admin/login - authenticate and receive a session token.
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<AdminSession, SubmitError> {
        let response = self
            .http
            .post(format!("{}/admin/login", self.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        let envelope: Envelope<AdminSession> = response.json().await.map_err(transport_error)?;
        Ok(envelope.data)
    }

    /// GET /admin/waitlist - per-audience counts and recent entries.
    pub async fn admin_summary(&self, token: &str) -> Result<Value, SubmitError> {
        let response = self
            .http
            .get(format!("{}/admin/waitlist", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        let envelope: Envelope<Value> = response.json().await.map_err(transport_error)?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl WaitlistBackend for ApiClient {
    async fn insert(&self, entry: &NewWaitlistEntry) -> Result<SubmittedEntry, SubmitError> {
        let body = serde_json::json!({
            "name": entry.name.as_str(),
            "email": entry.email.as_str(),
            "industry": entry.industry.as_str(),
            "company_size": entry.company_size.as_str(),
            "early_career_hires_per_year": entry.early_career_hires_per_year.map(|h| h.value()),
            "audience": entry.audience.as_str(),
        });

        let response = self
            .http
            .post(format!("{}/waitlist", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        let envelope: Envelope<SubmittedEntry> = response.json().await.map_err(transport_error)?;
        Ok(envelope.data)
    }
}

fn transport_error(err: reqwest::Error) -> SubmitError {
    SubmitError::Network(err.to_string())
}

/// Map a non-2xx response onto the submission taxonomy. Body shape is
/// `{error: string}` with optional `field_errors` and `retryAfter`.
async fn error_from_response(response: reqwest::Response) -> SubmitError {
    let status = response.status().as_u16();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("request failed")
        .to_string();

    classify_response(status, &message, &body)
}

fn classify_response(status: u16, message: &str, body: &Value) -> SubmitError {
    match status {
        400 | 422 => SubmitError::Validation {
            field_errors: body
                .get("field_errors")
                .and_then(Value::as_object)
                .map(|map| {
                    map.iter()
                        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                        .collect()
                })
                .unwrap_or_default(),
        },
        401 | 403 => SubmitError::Auth(message.to_string()),
        409 => SubmitError::Duplicate,
        429 => SubmitError::RateLimited {
            retry_after_secs: body.get("retryAfter").and_then(Value::as_u64).unwrap_or(60),
        },
        500..=599 => SubmitError::Server(message.to_string()),
        _ => SubmitError::Unknown,
    }
}
