use super::execute_if_available;
use crate::tests::fixtures::{
    code_samples::{JAVA_HELLO, JAVA_NAMED_CLASS, JAVA_NESTED_PUBLIC_CLASS},
    failures::JAVA_SYNTAX_ERROR,
};

const TOOLS: &[&str] = &["javac", "java"];

#[tokio::test]
async fn test_java_hello() {
    let Some(result) = execute_if_available(TOOLS, JAVA_HELLO, "java").await else {
        return;
    };
    assert!(result.success, "{}", result.error);
    assert_eq!(result.output, "Hello from Java!\n");
}

#[tokio::test]
async fn test_java_entry_point_from_class_name() {
    let Some(result) = execute_if_available(TOOLS, JAVA_NAMED_CLASS, "java").await else {
        return;
    };
    assert!(result.success, "{}", result.error);
    assert_eq!(result.output, "Hello from Foo!\n");
}

#[tokio::test]
async fn test_java_nested_public_class_runs_main() {
    let Some(result) = execute_if_available(TOOLS, JAVA_NESTED_PUBLIC_CLASS, "java").await else {
        return;
    };
    assert!(result.success, "{}", result.error);
    assert_eq!(result.output, "Hello from Helper!\n");
}

#[tokio::test]
async fn test_java_compile_error() {
    let Some(result) = execute_if_available(TOOLS, JAVA_SYNTAX_ERROR, "java").await else {
        return;
    };
    assert!(!result.success);
    assert_eq!(result.output, "");
    assert!(result.error.contains("Broken.java"), "{}", result.error);
}
