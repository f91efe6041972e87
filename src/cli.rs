//! Command-line interface

use anyhow::bail;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::app::{self, App, ClassifyOutcome};
use crate::auth::{FileTokenProvider, TokenProvider, DEFAULT_TOKEN_PATH};
use crate::config::Config;
use crate::error::TriageError;
use crate::form::SelectedFile;
use crate::ui::{self, Severity};

#[derive(Parser, Debug)]
#[command(name = "mail-triage")]
#[command(version)]
#[command(about = "Classify emails and review your inbox through the triage backend", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Path to the session token file
    #[arg(long, default_value = DEFAULT_TOKEN_PATH)]
    pub token_file: PathBuf,

    /// Override the API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Derive the API base URL from a host name (localhost routes to the
    /// fixed local port, anything else to https://<host>/api)
    #[arg(long, conflicts_with = "base_url")]
    pub host: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify email text or a .txt/.pdf file
    Classify {
        /// Email text to classify
        #[arg(short, long)]
        text: Option<String>,

        /// Path to a file to classify
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Write the result to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Review unread Gmail messages with suggested replies
    Inbox {
        /// How many messages to preview
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Check backend connectivity
    Health,

    /// Manage the authenticated session
    Auth {
        /// Bearer token to verify and store (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,

        /// Show the current session's user profile
        #[arg(long)]
        show: bool,

        /// Clear the stored session token
        #[arg(long)]
        logout: bool,
    },

    /// Show the Gmail connection status
    Status,

    /// Disconnect the backend's Gmail integration
    Disconnect,

    /// Probe the backend's AI pipeline
    TestAi {
        /// Custom question to send to the model
        #[arg(short, long)]
        question: Option<String>,
    },

    /// Generate example configuration file
    InitConfig {
        /// Path to create config file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

/// Resolve the effective config, applying CLI overrides
pub async fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(&cli.config).await?;
    if let Some(host) = &cli.host {
        config.api.base_url = Config::base_url_for_host(host);
    }
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Execute the parsed command
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                return Err(TriageError::ConfigError(format!(
                    "Configuration file already exists at {:?}. Use --force to overwrite.",
                    output
                ))
                .into());
            }
            Config::create_example(output).await?;
            println!("Created example configuration file at: {:?}", output);
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli).await?;
    let tokens: Arc<dyn TokenProvider> = Arc::new(FileTokenProvider::new(cli.token_file.clone()));
    let mut app = App::new(config, Arc::clone(&tokens))?;

    match cli.command {
        Commands::Classify { text, file, output } => {
            // Startup health probe, fire-and-forget like the page load one
            app.spawn_health_probe();

            if let Some(text) = text {
                app.form_mut().set_text(text);
            }
            if let Some(path) = &file {
                let selected = SelectedFile::load(path).await?;
                ui::toast(&format!("Selected: {}", selected.summary()), Severity::Info);
                let upload = app.config().upload.clone();
                app.form_mut().attach_file(selected, &upload)?;
            }

            let outcome = app.classify().await;
            let result = match outcome {
                ClassifyOutcome::Rendered(result) => result,
                ClassifyOutcome::Blocked => return Ok(()),
                ClassifyOutcome::Failed => bail!("Classification failed"),
            };

            if let Some(path) = output {
                app::export_result(&result, &path).await?;
                ui::toast(
                    &format!("Result written to {:?}", path),
                    Severity::Success,
                );
            }

            // Release the file slot now that the submission completed
            app.reset();
            Ok(())
        }

        Commands::Inbox { limit } => {
            let limit = limit.unwrap_or(app.config().inbox.preview_limit);
            app.inbox_review(limit).await?;
            Ok(())
        }

        Commands::Health => {
            if app.check_health().await {
                Ok(())
            } else {
                bail!("Backend health check failed")
            }
        }

        Commands::Auth { token, show, logout } => {
            let provider = FileTokenProvider::new(cli.token_file.clone());

            if logout {
                provider.clear().await?;
                ui::toast("Signed out", Severity::Success);
                return Ok(());
            }

            if show {
                let user = app.api().me().await?;
                println!("Signed in as: {}", user.email.as_deref().unwrap_or("(unknown)"));
                if let Some(name) = &user.name {
                    println!("Name: {}", name);
                }
                return Ok(());
            }

            let token = match token {
                Some(token) => token,
                None => inquire::Password::new("Paste your session token:")
                    .without_confirmation()
                    .prompt()?,
            };

            // Store first so verify_token goes out with the new bearer,
            // then roll back if the backend rejects it
            provider.store(&token).await?;
            match app.api().verify_token().await {
                Ok(user) => {
                    info!("Token verified for {:?}", user.email);
                    ui::toast(
                        &format!(
                            "Signed in as {}",
                            user.email.as_deref().unwrap_or("(unknown)")
                        ),
                        Severity::Success,
                    );
                    Ok(())
                }
                Err(e) => {
                    provider.clear().await?;
                    bail!("Token verification failed: {}", e)
                }
            }
        }

        Commands::Status => {
            let status = app.api().gmail_status().await?;
            if status.connected {
                ui::toast("Gmail is connected", Severity::Success);
            } else {
                ui::toast("Gmail is not connected", Severity::Warning);
                // Offer the authorization link right away instead of making
                // the user discover it through a failed preview
                match app.api().gmail_auth_url().await {
                    Ok(url) => println!("{}", ui::reauth_prompt(&url.auth_url)),
                    Err(e) => {
                        ui::toast(
                            &format!("Could not fetch the authorization link: {}", e),
                            Severity::Warning,
                        );
                    }
                }
            }
            Ok(())
        }

        Commands::Disconnect => {
            app.api().gmail_disconnect().await?;
            ui::toast("Gmail disconnected", Severity::Success);
            Ok(())
        }

        Commands::TestAi { question } => {
            let probe = app.api().test_ai(question.as_deref()).await?;
            match probe.error {
                Some(error) => bail!("AI probe failed: {}", error),
                None => {
                    ui::toast("AI is working correctly!", Severity::Success);
                    if let Some(answer) = probe.answer {
                        println!("Answer: {}", answer);
                    }
                    Ok(())
                }
            }
        }

        Commands::InitConfig { .. } => unreachable!("handled above"),
    }
}
