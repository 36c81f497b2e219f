pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fynda")]
#[command(about = "Fynda CLI - waitlist submission and admin tools")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "API server base URL (default: FYNDA_SERVER or http://localhost:3000)")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Submit a waitlist entry through the validation/retry pipeline")]
    Submit(commands::submit::SubmitArgs),

    #[command(about = "Admin back-office operations")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },

    #[command(about = "Check API server health")]
    Health,
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let base_url = cli
        .server
        .clone()
        .or_else(|| std::env::var("FYNDA_SERVER").ok())
        .unwrap_or_else(|| "http://localhost:3000".to_string());

    match cli.command {
        Commands::Submit(args) => commands::submit::handle(args, &base_url, output_format).await,
        Commands::Admin { cmd } => commands::admin::handle(cmd, &base_url, output_format).await,
        Commands::Health => commands::health::handle(&base_url, output_format).await,
    }
}
