//! Room Intake CLI - Bridge interface for the web front end
//!
//! Commands: styles, validate, submit, replay
//! Outputs JSON to stdout
//! Returns 2 on validation failure

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;

use roomintake_core::{
    logging, BudgetTier, EntryState, HandoffChannel, IntakeConfig, IntakeEvent, IntakeStage, Rejection,
    ReviewView, RoomType, SubmitError, INTAKE_VERSION,
};

#[derive(Parser)]
#[command(name = "roomintake-cli")]
#[command(about = "Room Intake CLI - validation and staged submission")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to an intake config JSON file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List room types, budget tiers, the style catalog and selection limits
    Styles,

    /// Validate an entry
    Validate {
        /// JSON payload (EntryState)
        #[arg(short, long)]
        payload: String,
    },

    /// Validate, build and hand off an entry, then show the review stage
    Submit {
        /// JSON payload (EntryState)
        #[arg(short, long)]
        payload: String,
    },

    /// Apply a sequence of form events to a fresh entry, then submit
    Replay {
        /// JSON array of IntakeEvent
        #[arg(short, long)]
        events: String,
    },
}

fn emit(value: &Value) {
    println!("{:#}", value);
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match IntakeConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                emit(&json!({"error": e.to_string()}));
                return ExitCode::FAILURE;
            }
        },
        None => IntakeConfig::default(),
    };

    match cli.command {
        Commands::Styles => {
            emit(&json!({
                "version": INTAKE_VERSION,
                "roomTypes": RoomType::ALL,
                "budgetTiers": BudgetTier::ALL,
                "styles": config.style_catalog,
                "maxStyles": config.limits.max_styles,
                "minPhotos": config.limits.min_photos,
                "maxPhotos": config.limits.max_photos,
            }));
            ExitCode::SUCCESS
        }

        Commands::Validate { payload } => {
            let state: EntryState = match serde_json::from_str(&payload) {
                Ok(s) => s,
                Err(e) => {
                    emit(&json!({"valid": false, "error": format!("Invalid payload: {}", e)}));
                    return ExitCode::FAILURE;
                }
            };

            let (stage, rejections) = IntakeStage::with_state(config, state);
            let result = stage.validate();
            match result.reason() {
                None => {
                    emit(&json!({"valid": true, "rejections": rejections}));
                    ExitCode::SUCCESS
                }
                Some(reason) => {
                    emit(&json!({"valid": false, "rejections": rejections, "error": reason}));
                    ExitCode::from(2)
                }
            }
        }

        Commands::Submit { payload } => {
            let state: EntryState = match serde_json::from_str(&payload) {
                Ok(s) => s,
                Err(e) => {
                    emit(&json!({"success": false, "error": format!("Invalid payload: {}", e)}));
                    return ExitCode::FAILURE;
                }
            };

            let (stage, rejections) = IntakeStage::with_state(config, state);
            submit_and_review(stage, rejections)
        }

        Commands::Replay { events } => {
            let events: Vec<IntakeEvent> = match serde_json::from_str(&events) {
                Ok(e) => e,
                Err(e) => {
                    emit(&json!({"success": false, "error": format!("Invalid events: {}", e)}));
                    return ExitCode::FAILURE;
                }
            };

            let mut stage = IntakeStage::new(config);
            let rejections: Vec<_> = events
                .into_iter()
                .filter_map(|event| stage.dispatch(event))
                .collect();

            submit_and_review(stage, rejections)
        }
    }
}

fn submit_and_review(mut stage: IntakeStage, rejections: Vec<Rejection>) -> ExitCode {
    let mut channel = HandoffChannel::default();
    let key = stage.config().handoff_key.clone();

    match stage.submit(&mut channel, chrono::Utc::now()) {
        Ok(_) => {
            let review = ReviewView::load(&channel, &key);
            emit(&json!({
                "success": true,
                "rejections": rejections,
                "review": review.to_json(),
            }));
            channel.end_session();
            ExitCode::SUCCESS
        }
        Err(SubmitError::Validation(e)) => {
            emit(&json!({
                "success": false,
                "rejections": rejections,
                "error": e.to_string(),
            }));
            ExitCode::from(2)
        }
        Err(e) => {
            emit(&json!({"success": false, "error": e.to_string()}));
            ExitCode::FAILURE
        }
    }
}
