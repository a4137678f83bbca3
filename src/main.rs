//! Huntboard CLI
//!
//! Lists the marketplace forms, validates a values file against one of
//! them, or runs a full submission against the simulated backend.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use huntboard::action::{Action, RouteRecorder, SimulatedAction, TracingNotifier};
use huntboard::catalog::{FormKind, JobBoard};
use huntboard::config::HuntboardConfig;
use huntboard::state::{
    validate, AfterSuccess, FormState, FormValues, StepOutcome, SubmitCoordinator, SubmitOutcome,
    ValidationResult, WizardForm,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "huntboard", version, about = "Validate and submit Huntboard forms")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available forms and their fields
    Forms,
    /// Validate a JSON values file against a form
    Validate {
        /// Form slug, e.g. job-application
        form: String,
        /// JSON object mapping field names to values
        values: PathBuf,
    },
    /// Validate and submit a JSON values file against the simulated backend
    Submit {
        form: String,
        values: PathBuf,
        /// Make the simulated backend reject the submission
        #[arg(long)]
        fail: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = HuntboardConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let ok = match cli.command {
        Commands::Forms => list_forms(&config),
        Commands::Validate { form, values } => validate_file(&config, &form, &values),
        Commands::Submit { form, values, fail } => submit_file(&config, &form, &values, fail).await,
    }?;

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn form_kind(slug: &str) -> Result<FormKind> {
    FormKind::from_slug(slug).ok_or_else(|| {
        let known: Vec<_> = FormKind::ALL.iter().map(FormKind::slug).collect();
        anyhow!("unknown form '{slug}' (expected one of: {})", known.join(", "))
    })
}

fn read_values(path: &Path) -> Result<FormValues> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a values object", path.display()))
}

fn list_forms(config: &HuntboardConfig) -> Result<bool> {
    let limits = config.upload_limits();
    for kind in FormKind::ALL {
        let schema = kind.schema(&limits)?;
        let steps = kind.steps().map(|s| s.len()).unwrap_or(1);
        println!("{} ({} step{})", kind.slug(), steps, if steps == 1 { "" } else { "s" });
        for field in schema.fields() {
            let marker = if field.required { "*" } else { " " };
            println!("  {marker} {:<20} {:<10} {}", field.name, field.kind.label(), field.label);
        }
    }
    Ok(true)
}

fn validate_file(config: &HuntboardConfig, slug: &str, path: &Path) -> Result<bool> {
    let kind = form_kind(slug)?;
    let schema = kind.schema(&config.upload_limits())?;
    let form = FormState::with_values(Arc::new(schema), read_values(path)?)?;

    match validate(form.schema(), form.values()) {
        ValidationResult::Valid => {
            println!("valid");
            Ok(true)
        }
        ValidationResult::Invalid(errors) => {
            println!("{}", serde_json::to_string_pretty(&errors)?);
            Ok(false)
        }
    }
}

async fn submit_file(
    config: &HuntboardConfig,
    slug: &str,
    path: &Path,
    fail: bool,
) -> Result<bool> {
    let kind = form_kind(slug)?;
    let schema = Arc::new(kind.schema(&config.upload_limits())?);
    let form = FormState::with_values(schema, read_values(path)?)?;

    let board = JobBoard::new();
    let action: Arc<dyn Action> = if fail {
        Arc::new(SimulatedAction::rejecting(
            config.simulated_delay(),
            "The server rejected the submission",
        ))
    } else if kind == FormKind::JobPosting {
        Arc::new(board.creator())
    } else {
        Arc::new(
            SimulatedAction::succeeding(config.simulated_delay(), kind.success_title())
                .with_reference_prefix(kind.reference_prefix()),
        )
    };

    let routes = RouteRecorder::new();
    let after = kind
        .success_route()
        .map_or(AfterSuccess::Reset, |route| AfterSuccess::Navigate(route.to_string()));
    let coordinator = SubmitCoordinator::new(form, action, Arc::new(TracingNotifier))
        .with_navigator(Arc::new(routes.clone()))
        .after_success(after)
        .success_title(kind.success_title());

    let outcome = match kind.steps() {
        Some(steps) => {
            let mut wizard = WizardForm::new(coordinator, steps)?;
            loop {
                match wizard.next_step() {
                    StepOutcome::Advanced(step) => tracing::info!(step, "moved to next step"),
                    StepOutcome::AtLastStep => break,
                    StepOutcome::Invalid(errors) => {
                        println!("step {} is invalid", wizard.current_step());
                        println!("{}", serde_json::to_string_pretty(&errors)?);
                        return Ok(false);
                    }
                }
            }
            wizard.submit().await
        }
        None => coordinator.submit().await,
    };

    match outcome {
        SubmitOutcome::Succeeded(payload) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            if let Some(route) = routes.current() {
                println!("navigated to {route}");
            }
            for posting in board.list() {
                println!("{}", serde_json::to_string_pretty(&posting)?);
            }
            Ok(true)
        }
        SubmitOutcome::Invalid(errors) => {
            println!("{}", serde_json::to_string_pretty(&errors)?);
            Ok(false)
        }
        SubmitOutcome::Failed(err) => {
            println!("submission failed: {err}");
            Ok(false)
        }
        other => Err(anyhow!("unexpected submission outcome: {other:?}")),
    }
}
