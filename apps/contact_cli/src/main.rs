use std::{path::Path, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{FormController, HistoryView, SimulatedTransport, SubmitOutcome};
use shared::{
    domain::{Field, FormInput},
    error::FieldErrors,
    validation::validate,
};
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, normalize_database_url, profile_database_url};

const PROFILES_DIR: &str = "./data/profiles";

#[derive(Parser, Debug)]
#[command(about = "Contact form with locally saved submissions")]
struct Cli {
    /// Overrides the configured database url.
    #[arg(long, conflicts_with = "profile")]
    database_url: Option<String>,
    /// Uses a named profile store under ./data/profiles.
    #[arg(long)]
    profile: Option<String>,
    /// Overrides the simulated delivery delay.
    #[arg(long)]
    delay_ms: Option<u64>,
    /// Prints JSON instead of text.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct FormArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    subject: String,
    #[arg(long, default_value = "")]
    message: String,
}

impl From<FormArgs> for FormInput {
    fn from(args: FormArgs) -> Self {
        FormInput::new(args.name, args.email, args.subject, args.message)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validates and saves a message.
    Submit(FormArgs),
    /// Validates a message without saving it.
    Check(FormArgs),
    /// Shows saved messages, newest first.
    List,
    /// Deletes all saved messages.
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings()?;
    if let Some(url) = cli.database_url.as_deref() {
        settings.database_url = url.to_string();
    }
    if let Some(profile) = cli.profile.as_deref() {
        settings.database_url = profile_database_url(Path::new(PROFILES_DIR), profile);
    }
    if let Some(delay_ms) = cli.delay_ms {
        settings.submit_delay_ms = delay_ms;
    }

    let database_url = normalize_database_url(&settings.database_url);
    let delay = Duration::from_millis(settings.submit_delay_ms);

    match cli.command {
        Command::Check(args) => {
            let errors = validate(&args.into());
            print_errors(&errors, cli.json)?;
            if errors.is_empty() && !cli.json {
                println!("All fields are valid.");
            }
            if !errors.is_empty() {
                bail!("{} field(s) need attention", errors.len());
            }
        }
        Command::Submit(args) => {
            let mut controller = open_controller(&database_url, delay).await?;
            let input = FormInput::from(args);
            for field in Field::ALL {
                controller.edit_field(field, input.get(field));
            }

            match controller.submit().await {
                SubmitOutcome::Accepted(submission) => {
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&submission)?);
                    } else {
                        print!("{}", render::success_banner(&submission.input().subject));
                    }
                }
                SubmitOutcome::Rejected(errors) => {
                    print_errors(&errors, cli.json)?;
                    bail!("{} field(s) need attention", errors.len());
                }
                SubmitOutcome::DeliveryFailed(reason) => bail!("message was not sent: {reason}"),
                SubmitOutcome::NotEditing => bail!("form is not accepting input"),
            }
        }
        Command::List => {
            let controller = open_controller(&database_url, delay).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(controller.history())?);
            } else {
                let view = HistoryView::from_submissions(controller.history());
                print!("{}", render::history(view.as_ref()));
            }
        }
        Command::Clear => {
            let mut controller = open_controller(&database_url, delay).await?;
            let cleared = controller.history().len();
            let persisted = controller.clear_all().await;
            if cli.json {
                println!("{}", render::clear_summary_json(cleared, persisted));
            } else {
                print!("{}", render::clear_summary(cleared, persisted));
            }
            if !persisted {
                bail!("saved messages could not be removed from the store");
            }
        }
    }

    Ok(())
}

async fn open_controller(database_url: &str, delay: Duration) -> Result<FormController> {
    let storage = Storage::new(database_url)
        .await
        .with_context(|| format!("failed to open submission store at '{database_url}'"))?;
    info!(%database_url, "opened submission store");

    let transport = SimulatedTransport::new(delay);
    Ok(FormController::initialize(Arc::new(storage), Arc::new(transport)).await)
}

fn print_errors(errors: &FieldErrors, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(errors)?);
    } else {
        print!("{}", render::field_errors(errors));
    }
    Ok(())
}
