use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::client::ApiClient;

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Login and print a session token")]
    Login {
        #[arg(help = "Admin email")]
        email: String,
        #[arg(long, help = "Password (falls back to FYNDA_ADMIN_PASSWORD)")]
        password: Option<String>,
    },

    #[command(about = "Show waitlist counts and recent entries")]
    Stats {
        #[arg(long, help = "Session token (falls back to FYNDA_TOKEN)")]
        token: Option<String>,
    },
}

pub async fn handle(
    cmd: AdminCommands,
    base_url: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let client = ApiClient::new(base_url);

    match cmd {
        AdminCommands::Login { email, password } => {
            let password = match password.or_else(|| std::env::var("FYNDA_ADMIN_PASSWORD").ok()) {
                Some(password) => password,
                None => {
                    output_error(
                        output_format,
                        "password required: pass --password or set FYNDA_ADMIN_PASSWORD",
                        None,
                    )?;
                    std::process::exit(1);
                }
            };

            match client.admin_login(&email, &password).await {
                Ok(session) => output_success(
                    output_format,
                    "Logged in",
                    Some(json!({
                        "token": session.token,
                        "user": {
                            "id": session.user.id,
                            "email": session.user.email,
                            "isSuperAdmin": session.user.is_super_admin,
                        }
                    })),
                ),
                Err(err) => {
                    output_error(output_format, &err.to_string(), None)?;
                    std::process::exit(1);
                }
            }
        }

        AdminCommands::Stats { token } => {
            let token = match token.or_else(|| std::env::var("FYNDA_TOKEN").ok()) {
                Some(token) => token,
                None => {
                    output_error(
                        output_format,
                        "session token required: pass --token or set FYNDA_TOKEN",
                        None,
                    )?;
                    std::process::exit(1);
                }
            };

            match client.admin_summary(&token).await {
                Ok(summary) => output_success(output_format, "Waitlist summary", Some(summary)),
                Err(err) => {
                    output_error(output_format, &err.to_string(), None)?;
                    std::process::exit(1);
                }
            }
        }
    }
}
