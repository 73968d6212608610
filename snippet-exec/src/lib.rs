//! # Snippet Execution
//!
//! Compiles and runs short Python, Java, C++ and JavaScript snippets as
//! child processes under a wall-clock timeout, and returns a
//! `{success, output, error}` record. Each call works in its own scratch
//! directory, which is removed before the call returns.
//!
//! Isolation is limited to running a separate process: executed code can
//! read and write the filesystem and use the network like any other process
//! of the calling user.

mod blocks;
mod config;
mod error;
mod executor;
mod languages;
mod process;
mod service;
mod state;
mod types;
mod workspace;

#[cfg(test)]
mod tests;

pub use blocks::{extract_code_blocks, BlockResult, CodeBlock};
pub use config::{ExecutorConfig, Toolchain};
pub use error::Error;
pub use executor::CodeExecutor;
pub use service::CodeExecutionService;
pub use state::ExecutionState;
pub use types::{
    ExecutionRequest, ExecutionResult, ExecutionStatus, Language, Outcome, Stage,
};

/// Result type for code execution operations
pub type Result<T> = std::result::Result<T, Error>;
