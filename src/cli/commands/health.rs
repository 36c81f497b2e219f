use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::client::ApiClient;

pub async fn handle(base_url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(base_url);

    match client.health().await {
        Ok(body) => output_success(output_format, "Server is reachable", Some(body)),
        Err(err) => {
            output_error(output_format, &err.to_string(), None)?;
            std::process::exit(1);
        }
    }
}
