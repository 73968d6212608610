use std::path::Path;

use crate::{CodeExecutor, ExecutorConfig, Result};

/// Config rooted in a test-owned directory with a short timeout.
pub fn test_config(work_dir: &Path) -> ExecutorConfig {
    ExecutorConfig::default()
        .with_work_dir(work_dir)
        .with_timeout_secs(10)
}

pub fn test_executor(work_dir: &Path) -> Result<CodeExecutor> {
    CodeExecutor::new(test_config(work_dir))
}

pub fn short_timeout_executor(work_dir: &Path) -> Result<CodeExecutor> {
    CodeExecutor::new(test_config(work_dir).with_timeout_secs(1))
}

/// True when nothing was left behind under `work_dir`.
pub fn is_empty_dir(work_dir: &Path) -> bool {
    std::fs::read_dir(work_dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}
