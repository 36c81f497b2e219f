//! Form state for the waitlist signup flow: raw field values, the submission
//! lifecycle stage, per-field errors, and debounced field validation.
//!
//! Field edits apply immediately; validation of the edited field runs once
//! after a quiet period, on the tokio runtime. Each field carries its own
//! cancellation handle, so rapid edits collapse into a single validation of
//! the last value, and dropping the form aborts everything still pending.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::client::SubmitError;
use crate::domain::{validate_field, Audience, Field, FieldErrors, FormValues};

/// Quiet period between the last keystroke and the validation run.
pub const DEBOUNCE_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Submission lifecycle. `Success` is terminal until an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStage {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug)]
struct FormInner {
    values: FormValues,
    stage: FormStage,
    field_errors: HashMap<Field, String>,
    form_error: Option<String>,
    validation_runs: u64,
}

/// Handle to one form instance. Cheap to share with the tasks it spawns;
/// all mutation goes through the inner lock.
#[derive(Debug)]
pub struct FormHandle {
    inner: Arc<Mutex<FormInner>>,
    pending: Mutex<HashMap<Field, JoinHandle<()>>>,
    quiet: Duration,
}

impl FormHandle {
    pub fn new(audience: Audience) -> Self {
        Self::with_quiet_period(audience, DEBOUNCE_QUIET_PERIOD)
    }

    pub fn with_quiet_period(audience: Audience, quiet: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FormInner {
                values: FormValues {
                    audience,
                    ..FormValues::default()
                },
                stage: FormStage::Idle,
                field_errors: HashMap::new(),
                form_error: None,
                validation_runs: 0,
            })),
            pending: Mutex::new(HashMap::new()),
            quiet,
        }
    }

    /// Apply an edit: store the value immediately, clear the field's error,
    /// cancel any validation still pending for the field, and (for non-empty
    /// input) schedule one validation run after the quiet period.
    pub fn update_field(&self, field: Field, value: &str) {
        {
            let mut state = self.lock();
            set_value(&mut state.values, field, value);
            state.field_errors.remove(&field);
            state.form_error = None;
            if state.stage == FormStage::Error {
                state.stage = FormStage::Idle;
            }
        }

        if let Some(previous) = self.pending.lock().expect("form lock poisoned").remove(&field) {
            previous.abort();
        }

        if value.trim().is_empty() {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let value = value.to_string();
        let quiet = self.quiet;
        let task = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let message = validate_field(field, &value);
            let mut state = inner.lock().expect("form lock poisoned");
            state.validation_runs += 1;
            if let Some(message) = message {
                state.field_errors.insert(field, message);
            }
        });
        self.pending
            .lock()
            .expect("form lock poisoned")
            .insert(field, task);
    }

    pub fn stage(&self) -> FormStage {
        self.lock().stage
    }

    pub fn values(&self) -> FormValues {
        self.lock().values.clone()
    }

    pub fn field_error(&self, field: Field) -> Option<String> {
        self.lock().field_errors.get(&field).cloned()
    }

    /// Snapshot of field errors keyed by wire field name.
    pub fn field_errors(&self) -> FieldErrors {
        self.lock()
            .field_errors
            .iter()
            .map(|(field, message)| (field.as_str().to_string(), message.clone()))
            .collect()
    }

    /// Error from the last submission attempt that was not tied to a field.
    pub fn form_error(&self) -> Option<String> {
        self.lock().form_error.clone()
    }

    /// How many debounced validations have completed. Superseded edits never
    /// increment this.
    pub fn validation_runs(&self) -> u64 {
        self.lock().validation_runs
    }

    /// Enter `Loading` if no submission is in flight. Returns false while a
    /// submission is already running or after a terminal success.
    pub(crate) fn begin_submit(&self) -> bool {
        let mut state = self.lock();
        match state.stage {
            FormStage::Idle | FormStage::Error => {
                state.stage = FormStage::Loading;
                state.form_error = None;
                true
            }
            FormStage::Loading | FormStage::Success => false,
        }
    }

    pub(crate) fn complete_success(&self) {
        let mut state = self.lock();
        state.stage = FormStage::Success;
        state.field_errors.clear();
        state.form_error = None;
    }

    pub(crate) fn complete_failure(&self, error: &SubmitError) {
        let mut state = self.lock();
        state.stage = FormStage::Error;
        match error {
            SubmitError::Validation { field_errors } => {
                for (name, message) in field_errors {
                    if let Some(field) = field_from_str(name) {
                        state.field_errors.insert(field, message.clone());
                    }
                }
            }
            other => state.form_error = Some(other.to_string()),
        }
    }

    /// Leave `Success` (or any stage) and start over with empty fields.
    pub fn reset(&self) {
        for (_, task) in self.pending.lock().expect("form lock poisoned").drain() {
            task.abort();
        }
        let mut state = self.lock();
        let audience = state.values.audience;
        state.values = FormValues {
            audience,
            ..FormValues::default()
        };
        state.stage = FormStage::Idle;
        state.field_errors.clear();
        state.form_error = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FormInner> {
        self.inner.lock().expect("form lock poisoned")
    }
}

impl Drop for FormHandle {
    // Pending validations must not run once the form is gone.
    fn drop(&mut self) {
        for (_, task) in self.pending.lock().expect("form lock poisoned").drain() {
            task.abort();
        }
    }
}

fn set_value(values: &mut FormValues, field: Field, value: &str) {
    let slot = match field {
        Field::Name => &mut values.name,
        Field::Email => &mut values.email,
        Field::Industry => &mut values.industry,
        Field::CompanySize => &mut values.company_size,
        Field::EarlyCareerHiresPerYear => &mut values.early_career_hires_per_year,
    };
    *slot = value.to_string();
}

fn field_from_str(name: &str) -> Option<Field> {
    [
        Field::Name,
        Field::Email,
        Field::Industry,
        Field::CompanySize,
        Field::EarlyCareerHiresPerYear,
    ]
    .into_iter()
    .find(|field| field.as_str() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLE: Duration = Duration::from_millis(350);

    #[tokio::test(start_paused = true)]
    async fn rapid_edits_validate_once_with_the_last_value() {
        let form = FormHandle::new(Audience::Employer);

        form.update_field(Field::Name, "J");
        form.update_field(Field::Name, "Jo7");
        form.update_field(Field::Name, "Jo");
        tokio::time::sleep(SETTLE).await;

        assert_eq!(form.validation_runs(), 1);
        assert!(form.field_error(Field::Name).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn last_invalid_value_wins() {
        let form = FormHandle::new(Audience::Employer);

        form.update_field(Field::Email, "jo@x.com");
        form.update_field(Field::Email, "jo@x");
        tokio::time::sleep(SETTLE).await;

        assert_eq!(form.validation_runs(), 1);
        assert!(form.field_error(Field::Email).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn emptied_field_schedules_no_validation() {
        let form = FormHandle::new(Audience::Employer);

        form.update_field(Field::Name, "J");
        form.update_field(Field::Name, "");
        tokio::time::sleep(SETTLE).await;

        assert_eq!(form.validation_runs(), 0);
        assert!(form.field_error(Field::Name).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn editing_clears_the_field_error_immediately() {
        let form = FormHandle::new(Audience::Employer);

        form.update_field(Field::Name, "J");
        tokio::time::sleep(SETTLE).await;
        assert!(form.field_error(Field::Name).is_some());

        form.update_field(Field::Name, "Jo");
        assert!(form.field_error(Field::Name).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_pending_validation() {
        let form = FormHandle::new(Audience::Employer);
        let inner = Arc::clone(&form.inner);

        form.update_field(Field::Name, "J");
        drop(form);
        tokio::time::sleep(SETTLE).await;

        assert_eq!(inner.lock().unwrap().validation_runs, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn only_one_submission_may_be_in_flight() {
        let form = FormHandle::new(Audience::Employer);

        assert!(form.begin_submit());
        assert_eq!(form.stage(), FormStage::Loading);
        assert!(!form.begin_submit());

        form.complete_success();
        assert_eq!(form.stage(), FormStage::Success);
        // Success is terminal until reset.
        assert!(!form.begin_submit());

        form.reset();
        assert_eq!(form.stage(), FormStage::Idle);
        assert!(form.begin_submit());
    }
}
