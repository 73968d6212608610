use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// Supported programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
    Cpp,
    JavaScript,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::JavaScript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::JavaScript => "javascript",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "cpp" => Ok(Language::Cpp),
            "javascript" => Ok(Language::JavaScript),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Code execution request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Source code to execute
    pub code: String,
    /// Language identifier, matched case-insensitively
    pub language: String,
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
        }
    }
}

/// The record handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// True only if every stage exited with status 0
    pub success: bool,
    /// Stdout of the run stage
    pub output: String,
    /// Stderr of the failing stage, or a diagnostic
    pub error: String,
}

impl ExecutionResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: error.into(),
        }
    }
}

impl From<Outcome> for ExecutionResult {
    fn from(outcome: Outcome) -> Self {
        let success = outcome.is_success();
        let error = match outcome.status {
            ExecutionStatus::Timeout { stage, secs } => {
                let notice = Error::Timeout { stage, secs }.to_string();
                if outcome.stderr.is_empty() {
                    notice
                } else {
                    format!("{}\n{}", outcome.stderr.trim_end(), notice)
                }
            }
            _ => outcome.stderr,
        };

        Self {
            success,
            output: outcome.stdout,
            error,
        }
    }
}

impl From<Error> for ExecutionResult {
    fn from(err: Error) -> Self {
        ExecutionResult::failure(err.to_string())
    }
}

/// Pipeline stage a subprocess belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Compile,
    Run,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Compile => f.write_str("compile"),
            Stage::Run => f.write_str("run"),
        }
    }
}

/// Execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    RuntimeError,
    CompilationError,
    Timeout { stage: Stage, secs: u64 },
}

/// Full result of one pipeline, before it is flattened for callers.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub status: ExecutionStatus,
    pub stdout: String,
    pub stderr: String,
    /// Wall-clock time of the stage that decided the status
    pub elapsed: Duration,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.status, ExecutionStatus::Timeout { .. })
    }
}
