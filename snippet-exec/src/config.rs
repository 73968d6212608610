use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{error::Error, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Executor configuration, usually loaded from a TOML file.
///
/// ```toml
/// work_dir = "/var/tmp/snippets"
/// timeout_secs = 10
///
/// [toolchain]
/// python = "python3"
/// cpp_compiler = "clang++"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Root under which every invocation gets its own scratch directory
    pub work_dir: PathBuf,
    /// Wall-clock budget for each compile or run subprocess
    pub timeout_secs: u64,
    pub toolchain: Toolchain,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            toolchain: Toolchain::default(),
        }
    }
}

impl ExecutorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ExecutorConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than 0".to_string()));
        }
        if self.work_dir.as_os_str().is_empty() {
            return Err(Error::Config("work_dir must not be empty".to_string()));
        }
        self.toolchain.validate()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Commands used for each toolchain. Bare names are looked up on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Toolchain {
    pub python: String,
    pub javac: String,
    pub java: String,
    pub cpp_compiler: String,
    pub node: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            javac: "javac".to_string(),
            java: "java".to_string(),
            cpp_compiler: "g++".to_string(),
            node: "node".to_string(),
        }
    }
}

impl Toolchain {
    fn validate(&self) -> Result<()> {
        let entries = [
            ("python", &self.python),
            ("javac", &self.javac),
            ("java", &self.java),
            ("cpp_compiler", &self.cpp_compiler),
            ("node", &self.node),
        ];
        for (key, command) in entries {
            if command.trim().is_empty() {
                return Err(Error::Config(format!("toolchain.{} must not be empty", key)));
            }
        }
        Ok(())
    }
}
