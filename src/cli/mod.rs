use crate::constants::{
    APP_DESCRIPTION, APP_NAME, DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, LOG_FORMAT_TEXT,
};
use clap::{Args, Parser, Subcommand};

/// A mental wellness chat companion with mood tracking
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Log output format
    #[clap(long, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON], default_value = LOG_FORMAT_TEXT)]
    pub log_format: String,

    /// Log level used when RUST_LOG is not set
    #[clap(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Talk about how you are feeling
    Chat {
        /// Send a single message instead of starting a conversation
        #[clap(short, long)]
        message: Option<String>,
    },

    /// Show the mood history and its summary
    Mood,

    /// List, recommend, and complete exercises
    Exercises(ExercisesArgs),
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct ExercisesArgs {
    /// List only the current recommendations
    #[clap(short, long)]
    pub recommended: bool,

    #[clap(subcommand)]
    pub action: Option<ExerciseAction>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ExerciseAction {
    /// Recommend exercises from the mood history
    Recommend,

    /// Mark an exercise as completed
    Complete {
        /// Exercise id as shown by `calmly exercises`
        id: String,
    },

    /// Restore the default exercise catalog
    Reset,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        <CliArgs as Parser>::parse_from(std::env::args())
    }
}
