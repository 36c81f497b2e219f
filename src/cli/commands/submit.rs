use std::sync::Arc;

use clap::Args;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, SubmissionService, SubmitError, WaitlistBackend};
use crate::domain::Field;
use crate::form::FormHandle;

#[derive(Debug, Args)]
pub struct SubmitArgs {
    #[arg(long, help = "Full name")]
    pub name: String,

    #[arg(long, help = "Email address")]
    pub email: String,

    #[arg(long, help = "Industry (e.g. Technology, Healthcare, ...)")]
    pub industry: String,

    #[arg(long = "company-size", help = "Company size bracket (e.g. 1-10, 11-50, ...)")]
    pub company_size: String,

    #[arg(long = "hires-per-year", help = "Early-career hires per year (optional)")]
    pub hires_per_year: Option<String>,

    #[arg(long, default_value = "employer", help = "Waitlist audience: employer or candidate")]
    pub audience: String,
}

/// Run a submission through the same pipeline a form front-end would use:
/// form handle, full validation, retrying insert.
pub async fn handle(
    args: SubmitArgs,
    base_url: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let audience = match crate::domain::Audience::parse(&args.audience) {
        Ok(audience) => audience,
        Err(msg) => {
            output_error(output_format, &msg, None)?;
            std::process::exit(1);
        }
    };

    let form = FormHandle::new(audience);
    form.update_field(Field::Name, &args.name);
    form.update_field(Field::Email, &args.email);
    form.update_field(Field::Industry, &args.industry);
    form.update_field(Field::CompanySize, &args.company_size);
    if let Some(hires) = &args.hires_per_year {
        form.update_field(Field::EarlyCareerHiresPerYear, hires);
    }

    let backend: Arc<dyn WaitlistBackend> = Arc::new(ApiClient::new(base_url));
    let service = SubmissionService::new(backend);

    match service.submit_form(&form).await {
        Some(Ok(entry)) => output_success(
            output_format,
            "You're on the waitlist",
            Some(json!({
                "id": entry.id,
                "email": entry.email,
                "audience": entry.audience,
                "created_at": entry.created_at,
            })),
        ),
        Some(Err(SubmitError::Validation { field_errors })) => {
            output_error(output_format, "Please fix the highlighted fields", Some(&field_errors))?;
            std::process::exit(1);
        }
        Some(Err(err)) => {
            output_error(output_format, &err.to_string(), None)?;
            std::process::exit(1);
        }
        // A fresh form is never mid-flight; kept for completeness.
        None => {
            output_error(output_format, "a submission is already in flight", None)?;
            std::process::exit(1);
        }
    }
}
