use anyhow::Result;
use clap::Parser;
use mail_triage::cli::{self, Cli};
use mail_triage::error::TriageError;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Exit with proper code on error
    if let Err(e) = run().await {
        display_error(&e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with level based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("mail_triage=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("mail_triage=info,warn,error"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::debug!("mail-triage starting");

    cli::execute(cli).await
}

/// Display error with context and a hint where one helps
fn display_error(error: &anyhow::Error) {
    eprintln!("Error: {}", error);

    let mut cause = error.source();
    while let Some(e) = cause {
        eprintln!("  Caused by: {}", e);
        cause = e.source();
    }

    if let Some(triage_err) = error.downcast_ref::<TriageError>() {
        match triage_err {
            TriageError::NotAuthenticated | TriageError::AuthError(_) => {
                eprintln!("\nHint: Sign in first with: mail-triage auth");
            }
            TriageError::NetworkFailure(_) => {
                eprintln!("\nHint: Check that the backend is running and reachable.");
                eprintln!("      Try: mail-triage health");
            }
            TriageError::ConfigError(_) => {
                eprintln!("\nHint: Check your configuration file for errors.");
                eprintln!("      Run: mail-triage init-config --force");
            }
            _ => {}
        }
    }
}
