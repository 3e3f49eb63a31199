use std::path::PathBuf;

use clap::Args;

use crate::quiz::{AdvanceDelay, SessionError};

/// Settings shared by every subcommand, read from flags or the environment.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Seconds to show feedback before the next question.
    #[arg(
        long = "delay",
        env = "QUIZ_ADVANCE_SECS",
        default_value_t = 3,
        value_parser = clap::value_parser!(u64).range(AdvanceDelay::MIN..=AdvanceDelay::MAX),
        global = true
    )]
    pub advance_secs: u64,

    /// JSON file holding the stored quizzes.
    #[arg(
        long = "store",
        env = "QUIZ_STORE",
        default_value = "quiz_store.json",
        global = true
    )]
    pub store_path: PathBuf,
}

impl Config {
    pub fn advance_delay(&self) -> Result<AdvanceDelay, SessionError> {
        AdvanceDelay::try_from(self.advance_secs)
    }
}
