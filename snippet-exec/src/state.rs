//! Per-invocation lifecycle.
//!
//! ```text
//! NotStarted ─► Compiling ─► Compiled ─► Running ─► Completed
//!     │             │                       ├─────► RunFailed
//!     │             ├─► CompileFailed       └─────► TimedOut
//!     │             └─► TimedOut
//!     └──────────────────────────────────► Running
//! ```
//!
//! Run-only languages skip straight from `NotStarted` to `Running`.

use tracing::debug;

use crate::{error::Error, types::Language, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    NotStarted,
    Compiling,
    Compiled,
    CompileFailed,
    Running,
    Completed,
    RunFailed,
    TimedOut,
}

impl ExecutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionState::CompileFailed
                | ExecutionState::Completed
                | ExecutionState::RunFailed
                | ExecutionState::TimedOut
        )
    }

    fn can_move_to(&self, next: ExecutionState) -> bool {
        use ExecutionState::*;
        matches!(
            (self, next),
            (NotStarted, Compiling)
                | (NotStarted, Running)
                | (Compiling, Compiled)
                | (Compiling, CompileFailed)
                | (Compiling, TimedOut)
                | (Compiled, Running)
                | (Running, Completed)
                | (Running, RunFailed)
                | (Running, TimedOut)
        )
    }
}

/// Tracks the state of one execution and rejects illegal moves.
#[derive(Debug)]
pub struct Lifecycle {
    language: Language,
    state: ExecutionState,
}

impl Lifecycle {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            state: ExecutionState::NotStarted,
        }
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn advance(&mut self, next: ExecutionState) -> Result<()> {
        if !self.state.can_move_to(next) {
            return Err(Error::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!(language = %self.language, from = ?self.state, to = ?next, "state transition");
        self.state = next;
        Ok(())
    }
}
