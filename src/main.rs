/*!
# Calmly - A Mental Wellness Chat Companion

This file contains the main application flow: logging setup, configuration,
and dispatch of the CLI commands to the library operations.

## Usage

```
calmly [OPTIONS] <COMMAND>

Commands:
  chat       Talk about how you are feeling
  mood       Show the mood history and its summary
  exercises  List, recommend, and complete exercises

Options:
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
      --log-level <LOG_LEVEL>    Log level used when RUST_LOG is not set [default: warn]
  -h, --help                     Print help
  -V, --version                  Print version
```

## Configuration

See [`calmly::config`] for the environment variables that are read.
*/

use calmly::ai::model_from_config;
use calmly::cli::{CliArgs, Command, ExerciseAction, ExercisesArgs};
use calmly::config::Config;
use calmly::constants::{DATE_FORMAT_ISO, LOG_FORMAT_JSON};
use calmly::errors::AppResult;
use calmly::exercises::{fallback_exercises, Exercise};
use calmly::mood::MoodTracker;
use calmly::ops::chat::print_outcome;
use calmly::ops::{
    listen_for_interrupts, read_lines_in_background, refresh_recommendations, start_conversation,
    summarize, ChatSession,
};
use calmly::storage::FileStorage;
use calmly::store::ExerciseStore;
use chrono::{Local, NaiveDate};
use std::io::{self, BufReader, Write};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Logs go to stderr so stdout carries only
/// command output.
fn init_logging(format: &str, level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if format == LOG_FORMAT_JSON {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The main entry point for the calmly application.
///
/// 1. Parses command-line arguments and initializes logging
/// 2. Loads and validates configuration
/// 3. Runs the requested command against the data directory
///
/// # Errors
///
/// Only configuration errors and terminal I/O errors end the program; model
/// and storage failures are recovered inside the operations.
#[tokio::main]
async fn main() -> AppResult<()> {
    let args = CliArgs::parse();
    init_logging(&args.log_format, &args.log_level);

    info!("Starting calmly");
    debug!("CLI arguments: {:?}", args);

    let config = Config::load()?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let storage = FileStorage::new(&config.data_dir);

    match args.command {
        Command::Chat { message } => run_chat(&config, &storage, message).await,
        Command::Mood => show_mood(&storage),
        Command::Exercises(exercise_args) => run_exercises(&storage, exercise_args),
    }
}

async fn run_chat(config: &Config, storage: &FileStorage, message: Option<String>) -> AppResult<()> {
    let model = model_from_config(config);
    info!("Using model {}", model.model_name());
    let mut session = ChatSession::new(model.as_ref(), storage, config.request_timeout);

    match message {
        Some(message) => {
            let mut interrupts = listen_for_interrupts();
            let outcome = session
                .process_turn_interruptible(&message, today(), &mut interrupts)
                .await;
            print_outcome(&mut io::stdout().lock(), &outcome)
        }
        None => {
            let mut interrupts = listen_for_interrupts();
            let mut input = read_lines_in_background(BufReader::new(io::stdin()));
            start_conversation(&mut session, &mut input, &mut interrupts, io::stdout(), today)
                .await
        }
    }
}

fn show_mood(storage: &FileStorage) -> AppResult<()> {
    let entries = MoodTracker::new(storage).load(today());
    let mut out = io::stdout().lock();

    writeln!(out, "Mood history:")?;
    for entry in &entries {
        writeln!(
            out,
            "  {} {}  {}",
            entry.date.format(DATE_FORMAT_ISO),
            entry.day,
            entry.value
        )?;
    }

    if let Some(summary) = summarize(&entries) {
        writeln!(out)?;
        writeln!(
            out,
            "Average: {:.1}/5 ({})",
            summary.average, summary.description
        )?;
        writeln!(out, "Trend: {}", summary.trend)?;
        writeln!(
            out,
            "Highest: {} ({})",
            summary.highest.day,
            summary.highest.date.format(DATE_FORMAT_ISO)
        )?;
        writeln!(
            out,
            "Lowest: {} ({})",
            summary.lowest.day,
            summary.lowest.date.format(DATE_FORMAT_ISO)
        )?;
        writeln!(out, "{}", summary.advice)?;
    }
    Ok(())
}

fn run_exercises(storage: &FileStorage, args: ExercisesArgs) -> AppResult<()> {
    let mut store = ExerciseStore::open(storage);
    let mut out = io::stdout().lock();

    match args.action {
        None if args.recommended => {
            if store.recommended_exercises().is_empty() {
                writeln!(out, "No recommendations yet. Try `calmly exercises recommend`.")?;
            }
            for exercise in store.recommended_exercises() {
                print_exercise(&mut out, exercise, store.is_completed(&exercise.id))?;
            }
        }
        None if store.all_exercises().is_empty() => {
            warn!("Exercise catalog is empty, showing fallback exercises");
            for exercise in fallback_exercises() {
                print_exercise(&mut out, &exercise, false)?;
            }
        }
        None => {
            for exercise in store.all_exercises() {
                print_exercise(&mut out, exercise, store.is_completed(&exercise.id))?;
            }
        }
        Some(ExerciseAction::Recommend) => {
            let entries = MoodTracker::new(storage).load(today());
            let count = refresh_recommendations(&mut store, &entries);
            if count == 0 {
                writeln!(out, "No new recommendations for your recent mood.")?;
            }
            for exercise in store.recommended_exercises() {
                print_exercise(&mut out, exercise, store.is_completed(&exercise.id))?;
            }
        }
        Some(ExerciseAction::Complete { id }) => {
            if store.state().resolve_catalog_id(&id).is_some() {
                store.mark_exercise_completed(&id);
                writeln!(out, "Marked {} as completed.", id)?;
            } else {
                writeln!(out, "Unknown exercise: {}", id)?;
            }
        }
        Some(ExerciseAction::Reset) => {
            store.reset_store();
            writeln!(out, "Exercise catalog reset.")?;
        }
    }
    Ok(())
}

fn print_exercise<W: Write>(out: &mut W, exercise: &Exercise, completed: bool) -> AppResult<()> {
    let mark = if completed { "x" } else { " " };
    writeln!(
        out,
        "[{}] {}  {} ({}, {})",
        mark, exercise.id, exercise.name, exercise.duration, exercise.category
    )?;
    writeln!(out, "    {}", exercise.description)?;
    for (i, step) in exercise.steps.iter().enumerate() {
        writeln!(out, "    {}. {}", i + 1, step)?;
    }
    Ok(())
}
