use std::sync::Arc;

use super::{SubmitError, SubmittedEntry, WaitlistBackend};
use crate::domain::{validate_form, FormValues};
use crate::form::FormHandle;
use crate::retry::{with_retry, RetryPolicy};

/// Composes the submission pipeline: full re-validation of the raw values,
/// the retrying remote insert, and the form state machine. Nothing below
/// this layer produces UI-facing text; it returns structured results only.
pub struct SubmissionService {
    backend: Arc<dyn WaitlistBackend>,
    policy: RetryPolicy,
}

impl SubmissionService {
    pub fn new(backend: Arc<dyn WaitlistBackend>) -> Self {
        Self::with_policy(backend, RetryPolicy::default())
    }

    pub fn with_policy(backend: Arc<dyn WaitlistBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Validate and submit. The raw values are re-validated here even when
    /// the form already validated per field; a boundary-crossing insert never
    /// trusts caller-side validation alone. Invalid input returns without
    /// touching the backend.
    pub async fn submit(&self, values: &FormValues) -> Result<SubmittedEntry, SubmitError> {
        let entry = validate_form(values)
            .map_err(|field_errors| SubmitError::Validation { field_errors })?;

        let result = with_retry(&self.policy, SubmitError::is_retryable, || {
            self.backend.insert(&entry)
        })
        .await;

        match &result {
            Ok(created) => {
                tracing::info!(id = %created.id, audience = %created.audience, "waitlist entry accepted");
            }
            Err(err) => {
                tracing::warn!(
                    email = %entry.email.redacted(),
                    error = %err,
                    "waitlist submission failed"
                );
            }
        }
        result
    }

    /// Submit a form, driving its stage machine. Returns `None` when a
    /// submission is already in flight (the second submit is ignored) or the
    /// form already succeeded.
    pub async fn submit_form(
        &self,
        form: &FormHandle,
    ) -> Option<Result<SubmittedEntry, SubmitError>> {
        if !form.begin_submit() {
            return None;
        }

        let values = form.values();
        let result = self.submit(&values).await;
        match &result {
            Ok(_) => form.complete_success(),
            Err(err) => form.complete_failure(err),
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Audience, NewWaitlistEntry};
    use crate::form::FormStage;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Backend that plays back a script of outcomes and counts calls.
    struct ScriptedBackend {
        script: Mutex<Vec<Result<(), SubmitError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<(), SubmitError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl WaitlistBackend for ScriptedBackend {
        async fn insert(&self, entry: &NewWaitlistEntry) -> Result<SubmittedEntry, SubmitError> {
            *self.calls.lock().unwrap() += 1;
            let mut script = self.script.lock().unwrap();
            let outcome = if script.is_empty() { Ok(()) } else { script.remove(0) };
            outcome.map(|_| SubmittedEntry {
                id: Uuid::new_v4(),
                name: entry.name.as_str().to_string(),
                email: entry.email.as_str().to_string(),
                audience: entry.audience.as_str().to_string(),
                industry: entry.industry.as_str().to_string(),
                company_size: entry.company_size.as_str().to_string(),
                early_career_hires_per_year: entry.early_career_hires_per_year.map(|h| h.value()),
                created_at: Utc::now(),
            })
        }
    }

    fn valid_values() -> FormValues {
        FormValues {
            name: "Jo".into(),
            email: "jo@x.com".into(),
            industry: "Technology".into(),
            company_size: "1-10".into(),
            early_career_hires_per_year: String::new(),
            audience: Audience::Employer,
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, std::time::Duration::from_millis(10))
    }

    #[tokio::test]
    async fn boundary_length_name_submits_successfully() {
        let backend = ScriptedBackend::new(vec![Ok(())]);
        let service = SubmissionService::new(backend.clone());

        let entry = service.submit(&valid_values()).await.unwrap();
        assert_eq!(entry.name, "Jo");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_backend() {
        let backend = ScriptedBackend::new(vec![]);
        let service = SubmissionService::new(backend.clone());

        let mut values = valid_values();
        values.name = "J".into();
        match service.submit(&values).await {
            Err(SubmitError::Validation { field_errors }) => {
                assert!(field_errors["name"].contains("at least 2 characters"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn negative_hires_never_reaches_the_backend() {
        let backend = ScriptedBackend::new(vec![]);
        let service = SubmissionService::new(backend.clone());

        let mut values = valid_values();
        values.early_career_hires_per_year = "-1".into();
        assert!(service.submit(&values).await.is_err());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn duplicate_on_second_submit_is_rejected_without_retry() {
        let backend = ScriptedBackend::new(vec![Ok(()), Err(SubmitError::Duplicate)]);
        let service = SubmissionService::new(backend.clone());

        assert!(service.submit(&valid_values()).await.is_ok());
        match service.submit(&valid_values()).await {
            Err(SubmitError::Duplicate) => {}
            other => panic!("unexpected {other:?}"),
        }
        // One call each; the duplicate was terminal, not retried.
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_server_errors_are_retried_until_success() {
        let backend = ScriptedBackend::new(vec![
            Err(SubmitError::Server("boom".into())),
            Err(SubmitError::Network("reset".into())),
            Ok(()),
        ]);
        let service =
            SubmissionService::with_policy(backend.clone(), fast_policy());

        assert!(service.submit(&valid_values()).await.is_ok());
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_budget_exhaustion_surfaces_the_last_error() {
        let backend = ScriptedBackend::new(vec![
            Err(SubmitError::Server("1".into())),
            Err(SubmitError::Server("2".into())),
            Err(SubmitError::Server("3".into())),
        ]);
        let service =
            SubmissionService::with_policy(backend.clone(), fast_policy());

        match service.submit(&valid_values()).await {
            Err(SubmitError::Server(msg)) => assert_eq!(msg, "3"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn submit_form_drives_the_stage_machine() {
        let backend = ScriptedBackend::new(vec![Ok(())]);
        let service = SubmissionService::new(backend.clone());

        let form = FormHandle::new(Audience::Employer);
        form.update_field(crate::domain::Field::Name, "Jo");
        form.update_field(crate::domain::Field::Email, "jo@x.com");
        form.update_field(crate::domain::Field::Industry, "Technology");
        form.update_field(crate::domain::Field::CompanySize, "1-10");

        let result = service.submit_form(&form).await.expect("not in flight");
        assert!(result.is_ok());
        assert_eq!(form.stage(), FormStage::Success);

        // Success is terminal: another submit is ignored, no backend call.
        assert!(service.submit_form(&form).await.is_none());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn failed_submit_records_field_errors_on_the_form() {
        let backend = ScriptedBackend::new(vec![]);
        let service = SubmissionService::new(backend.clone());

        let form = FormHandle::new(Audience::Employer);
        form.update_field(crate::domain::Field::Name, "J");

        let result = service.submit_form(&form).await.expect("not in flight");
        assert!(result.is_err());
        assert_eq!(form.stage(), FormStage::Error);
        assert!(form.field_error(crate::domain::Field::Name).is_some());
        assert!(form.field_errors().contains_key("email"));
    }

    #[tokio::test]
    async fn second_submit_while_loading_is_ignored() {
        let form = FormHandle::new(Audience::Employer);
        assert!(form.begin_submit());

        let backend = ScriptedBackend::new(vec![Ok(())]);
        let service = SubmissionService::new(backend.clone());
        assert!(service.submit_form(&form).await.is_none());
        assert_eq!(backend.calls(), 0);
    }
}
