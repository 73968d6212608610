use std::path::Path;

use crate::{
    languages::LanguageHandler, process::CommandSpec, types::Language, workspace::Workspace,
};

pub struct JavaScriptHandler {
    node: String,
}

impl JavaScriptHandler {
    pub fn new(node: impl Into<String>) -> Self {
        Self { node: node.into() }
    }
}

impl Default for JavaScriptHandler {
    fn default() -> Self {
        Self::new("node")
    }
}

impl LanguageHandler for JavaScriptHandler {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn file_extension(&self) -> &str {
        "js"
    }

    fn required_tools(&self) -> Vec<&str> {
        vec![self.node.as_str()]
    }

    fn run_command(&self, workspace: &Workspace, source: &Path) -> CommandSpec {
        CommandSpec::new(&self.node)
            .arg(source)
            .current_dir(workspace.path())
    }
}
