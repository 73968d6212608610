use super::execute_if_available;
use crate::tests::fixtures::{
    code_samples::CPP_HELLO,
    failures::{CPP_SEGFAULT, CPP_SYNTAX_ERROR},
};

const TOOLS: &[&str] = &["g++"];

#[tokio::test]
async fn test_cpp_hello() {
    let Some(result) = execute_if_available(TOOLS, CPP_HELLO, "cpp").await else {
        return;
    };
    assert!(result.success, "{}", result.error);
    assert_eq!(result.output, "Hello from C++!\n");
}

#[tokio::test]
async fn test_cpp_compile_error_skips_run() {
    let Some(result) = execute_if_available(TOOLS, CPP_SYNTAX_ERROR, "cpp").await else {
        return;
    };
    assert!(!result.success);
    assert_eq!(result.output, "");
    assert!(result.error.contains("error"), "{}", result.error);
}

#[tokio::test]
async fn test_cpp_crash_reports_signal() {
    let Some(result) = execute_if_available(TOOLS, CPP_SEGFAULT, "cpp").await else {
        return;
    };
    assert!(!result.success);
    assert_eq!(result.output, "");
    assert!(
        result.error.starts_with("Process terminated by signal"),
        "{}",
        result.error
    );
}
