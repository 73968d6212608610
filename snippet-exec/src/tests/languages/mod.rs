use assert_fs::TempDir;

use super::utils::{is_empty_dir, test_executor};
use crate::{languages::skip_if_not_available, ExecutionResult};

mod cpp;
mod java;
mod javascript;
mod python;

/// Run `code` in a fresh work root and check that nothing was left behind.
pub(crate) async fn execute_and_check_cleanup(code: &str, language: &str) -> ExecutionResult {
    let root = TempDir::new().unwrap();
    let executor = test_executor(root.path()).unwrap();

    let result = executor.execute(code, language).await;
    assert!(
        is_empty_dir(root.path()),
        "artifacts left behind after a {} run",
        language
    );
    result
}

/// Returns `None` (and logs) when the toolchain is missing on this host.
pub(crate) async fn execute_if_available(
    tools: &[&str],
    code: &str,
    language: &str,
) -> Option<ExecutionResult> {
    if skip_if_not_available(tools) {
        return None;
    }
    Some(execute_and_check_cleanup(code, language).await)
}
