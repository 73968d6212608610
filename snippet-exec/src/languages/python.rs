use std::path::Path;

use crate::{
    languages::LanguageHandler, process::CommandSpec, types::Language, workspace::Workspace,
};

pub struct PythonHandler {
    interpreter: String,
}

impl PythonHandler {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl Default for PythonHandler {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl LanguageHandler for PythonHandler {
    fn language(&self) -> Language {
        Language::Python
    }

    fn file_extension(&self) -> &str {
        "py"
    }

    fn required_tools(&self) -> Vec<&str> {
        vec![self.interpreter.as_str()]
    }

    fn run_command(&self, workspace: &Workspace, source: &Path) -> CommandSpec {
        CommandSpec::new(&self.interpreter)
            .arg(source)
            .current_dir(workspace.path())
    }
}
