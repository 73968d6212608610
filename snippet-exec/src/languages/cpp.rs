use std::path::{Path, PathBuf};

use crate::{
    languages::LanguageHandler, process::CommandSpec, types::Language, workspace::Workspace,
};

pub struct CppHandler {
    compiler: String,
}

impl CppHandler {
    pub fn new(compiler: impl Into<String>) -> Self {
        Self {
            compiler: compiler.into(),
        }
    }

    fn executable(source: &Path) -> PathBuf {
        source.with_extension("")
    }
}

impl Default for CppHandler {
    fn default() -> Self {
        Self::new("g++")
    }
}

impl LanguageHandler for CppHandler {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn file_extension(&self) -> &str {
        "cpp"
    }

    fn required_tools(&self) -> Vec<&str> {
        vec![self.compiler.as_str()]
    }

    fn compile_command(&self, workspace: &Workspace, source: &Path) -> Option<CommandSpec> {
        Some(
            CommandSpec::new(&self.compiler)
                .arg(source)
                .arg("-o")
                .arg(Self::executable(source))
                .current_dir(workspace.path()),
        )
    }

    fn run_command(&self, workspace: &Workspace, source: &Path) -> CommandSpec {
        CommandSpec::new(Self::executable(source)).current_dir(workspace.path())
    }

    fn build_artifacts(&self, source: &Path) -> Vec<PathBuf> {
        vec![Self::executable(source)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use assert_fs::TempDir;

    #[tokio::test]
    async fn test_executable_is_source_without_extension() -> Result<()> {
        let root = TempDir::new().unwrap();
        let mut workspace = Workspace::create(root.path()).await?;
        let handler = CppHandler::new("clang++");

        let source = handler.write_source(&mut workspace, "int main() {}").await?;
        let executable = source.with_extension("");
        assert_eq!(source.extension().unwrap(), "cpp");

        let compile = handler.compile_command(&workspace, &source).unwrap();
        assert_eq!(
            compile.to_string(),
            format!("clang++ {} -o {}", source.display(), executable.display())
        );

        let run = handler.run_command(&workspace, &source);
        assert_eq!(PathBuf::from(&run.program), executable);
        assert!(run.args.is_empty());
        assert_eq!(handler.build_artifacts(&source), vec![executable]);

        workspace.cleanup().await
    }
}
