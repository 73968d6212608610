use super::execute_if_available;
use crate::tests::fixtures::{
    code_samples::PYTHON_HELLO,
    failures::{PYTHON_EXIT_CODE, PYTHON_RAISES, PYTHON_WARNS},
    test_scenarios::{PYTHON_MULTILINE, PYTHON_READS_STDIN},
};

const TOOLS: &[&str] = &["python3"];

#[tokio::test]
async fn test_python_hello() {
    let Some(result) = execute_if_available(TOOLS, PYTHON_HELLO, "python").await else {
        return;
    };
    assert!(result.success, "{}", result.error);
    assert_eq!(result.output, "Hello from Python!\n");
    assert!(result.error.is_empty());
}

#[tokio::test]
async fn test_python_language_is_case_insensitive() {
    let Some(result) = execute_if_available(TOOLS, PYTHON_MULTILINE, "PyThOn").await else {
        return;
    };
    assert!(result.success, "{}", result.error);
    assert_eq!(result.output, "Factorial of 5 is 120\n");
}

#[tokio::test]
async fn test_python_unhandled_exception() {
    let Some(result) = execute_if_available(TOOLS, PYTHON_RAISES, "python").await else {
        return;
    };
    assert!(!result.success);
    assert_eq!(result.output, "");
    assert!(result.error.contains("ValueError: boom"), "{}", result.error);
}

#[tokio::test]
async fn test_python_non_zero_exit_keeps_output() {
    let Some(result) = execute_if_available(TOOLS, PYTHON_EXIT_CODE, "python").await else {
        return;
    };
    assert!(!result.success);
    assert_eq!(result.output, "partial\n");
}

#[tokio::test]
async fn test_python_success_with_stderr() {
    let Some(result) = execute_if_available(TOOLS, PYTHON_WARNS, "python").await else {
        return;
    };
    assert!(result.success);
    assert_eq!(result.output, "done\n");
    assert_eq!(result.error, "deprecated call\n");
}

#[tokio::test]
async fn test_python_stdin_is_empty() {
    let Some(result) = execute_if_available(TOOLS, PYTHON_READS_STDIN, "python").await else {
        return;
    };
    assert!(result.success, "{}", result.error);
    assert_eq!(result.output, "read 0 bytes\n");
}
