//! Language-specific handler implementations

mod cpp;
mod java;
mod javascript;
mod python;

pub use cpp::CppHandler;
pub use java::JavaHandler;
pub use javascript::JavaScriptHandler;
pub use python::PythonHandler;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::{
    error::Error, process::resolve_program, process::CommandSpec, types::Language,
    workspace::Workspace, Result,
};

/// Compile/run recipe for one language.
///
/// Handlers only describe commands and file names; the executor drives the
/// pipeline, enforces the timeout and owns cleanup.
#[async_trait]
pub trait LanguageHandler: Send + Sync {
    fn language(&self) -> Language;

    /// Get the file extension for source files
    fn file_extension(&self) -> &str;

    /// Commands that must be resolvable before anything is written
    fn required_tools(&self) -> Vec<&str>;

    /// Stem of the source file. Defaults to the workspace's unique stem.
    fn source_stem(&self, _code: &str, workspace: &Workspace) -> String {
        workspace.default_stem()
    }

    /// Materialize the source inside the workspace
    async fn write_source(&self, workspace: &mut Workspace, code: &str) -> Result<PathBuf> {
        let stem = self.source_stem(code, workspace);
        workspace
            .write_source(&stem, self.file_extension(), code)
            .await
    }

    /// Compile step, if the language has one
    fn compile_command(&self, _workspace: &Workspace, _source: &Path) -> Option<CommandSpec> {
        None
    }

    fn run_command(&self, workspace: &Workspace, source: &Path) -> CommandSpec;

    /// Files the compile step produces next to the source
    fn build_artifacts(&self, _source: &Path) -> Vec<PathBuf> {
        Vec::new()
    }

    fn check_tools(&self) -> Result<()> {
        let missing: Vec<_> = self
            .required_tools()
            .into_iter()
            .filter(|tool| resolve_program(tool).is_err())
            .collect();

        if !missing.is_empty() {
            return Err(Error::ToolNotFound(missing.join(", ")));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn skip_if_not_available(tools: &[&str]) -> bool {
    let missing: Vec<_> = tools
        .iter()
        .filter(|tool| which::which(**tool).is_err())
        .map(|s| (*s).to_string())
        .collect();

    if !missing.is_empty() {
        eprintln!("Skipping test: {} not available", missing.join(", "));
        return true;
    }
    false
}
