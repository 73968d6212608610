use super::execute_if_available;
use crate::tests::fixtures::{code_samples::JS_HELLO, failures::JS_THROWS};

const TOOLS: &[&str] = &["node"];

#[tokio::test]
async fn test_javascript_hello() {
    let Some(result) = execute_if_available(TOOLS, JS_HELLO, "javascript").await else {
        return;
    };
    assert!(result.success, "{}", result.error);
    assert_eq!(result.output, "Hello from JavaScript!\n");
}

#[tokio::test]
async fn test_javascript_uncaught_error() {
    let Some(result) = execute_if_available(TOOLS, JS_THROWS, "JavaScript").await else {
        return;
    };
    assert!(!result.success);
    assert!(result.output.is_empty());
    assert!(result.error.contains("kaboom"), "{}", result.error);
}
