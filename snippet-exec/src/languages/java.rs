use regex::Regex;
use std::path::{Path, PathBuf};

use crate::{
    languages::LanguageHandler, process::CommandSpec, types::Language, workspace::Workspace,
};

const DEFAULT_CLASS: &str = "Main";

pub struct JavaHandler {
    javac: String,
    java: String,
    class_re: Regex,
}

impl JavaHandler {
    pub fn new(javac: impl Into<String>, java: impl Into<String>) -> Self {
        Self {
            javac: javac.into(),
            java: java.into(),
            class_re: Regex::new(
                r"\bpublic\s+(?:(?:final|abstract|sealed|strictfp)\s+)*class\s+([A-Za-z_$][A-Za-z0-9_$]*)",
            )
            .expect("class declaration pattern is valid"),
        }
    }

    /// Name of the first top-level `public class`, or `Main` when there is
    /// none.
    ///
    /// The source file is named after it, since `javac` insists that a
    /// public class lives in a file of the same name. Nested classes are
    /// skipped: they never name the file.
    pub fn entry_point(&self, code: &str) -> String {
        self.class_re
            .captures_iter(code)
            .filter(|caps| caps.get(0).is_some_and(|m| brace_depth(&code[..m.start()]) <= 0))
            .find_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| DEFAULT_CLASS.to_string())
    }
}

/// Net `{` nesting at the end of `prefix`.
fn brace_depth(prefix: &str) -> i64 {
    prefix.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

impl Default for JavaHandler {
    fn default() -> Self {
        Self::new("javac", "java")
    }
}

impl LanguageHandler for JavaHandler {
    fn language(&self) -> Language {
        Language::Java
    }

    fn file_extension(&self) -> &str {
        "java"
    }

    fn required_tools(&self) -> Vec<&str> {
        vec![self.javac.as_str(), self.java.as_str()]
    }

    fn source_stem(&self, code: &str, _workspace: &Workspace) -> String {
        self.entry_point(code)
    }

    fn compile_command(&self, workspace: &Workspace, source: &Path) -> Option<CommandSpec> {
        Some(
            CommandSpec::new(&self.javac)
                .arg(source)
                .current_dir(workspace.path()),
        )
    }

    fn run_command(&self, workspace: &Workspace, source: &Path) -> CommandSpec {
        let class_name = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_CLASS.to_string());

        CommandSpec::new(&self.java)
            .arg("-cp")
            .arg(workspace.path())
            .arg(class_name)
            .current_dir(workspace.path())
    }

    fn build_artifacts(&self, source: &Path) -> Vec<PathBuf> {
        vec![source.with_extension("class")]
    }
}
