use thiserror::Error;

use crate::state::ExecutionState;
use crate::types::Stage;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("Required tool not found on PATH: {0}")]
    ToolNotFound(String),

    #[error("{stage} stage timed out after {secs} seconds")]
    Timeout { stage: Stage, secs: u64 },

    #[error("Invalid execution state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: ExecutionState,
        to: ExecutionState,
    },

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
