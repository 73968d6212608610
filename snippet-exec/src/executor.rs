use std::collections::HashMap;
use tracing::{debug, error, info, warn};

use crate::{
    blocks::{extract_code_blocks, BlockResult},
    config::ExecutorConfig,
    error::Error,
    languages::{CppHandler, JavaHandler, JavaScriptHandler, LanguageHandler, PythonHandler},
    process::{self, Exit, ProcessOutput},
    state::{ExecutionState, Lifecycle},
    types::{ExecutionRequest, ExecutionResult, ExecutionStatus, Language, Outcome, Stage},
    workspace::Workspace,
    Result,
};

/// Dispatches snippets to the handler registered for their language.
pub struct CodeExecutor {
    config: ExecutorConfig,
    handlers: HashMap<Language, Box<dyn LanguageHandler>>,
}

impl CodeExecutor {
    /// Create an executor with the four built-in handlers
    pub fn new(config: ExecutorConfig) -> Result<Self> {
        config.validate()?;

        let toolchain = &config.toolchain;
        let handlers: Vec<Box<dyn LanguageHandler>> = vec![
            Box::new(PythonHandler::new(&toolchain.python)),
            Box::new(JavaHandler::new(&toolchain.javac, &toolchain.java)),
            Box::new(CppHandler::new(&toolchain.cpp_compiler)),
            Box::new(JavaScriptHandler::new(&toolchain.node)),
        ];
        let handlers = handlers
            .into_iter()
            .map(|handler| (handler.language(), handler))
            .collect();

        Ok(Self { config, handlers })
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn supported_languages(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|language| self.handlers.contains_key(language))
            .collect()
    }

    fn handler(&self, language: Language) -> Result<&dyn LanguageHandler> {
        self.handlers
            .get(&language)
            .map(|handler| &**handler)
            .ok_or_else(|| Error::UnsupportedLanguage(language.to_string()))
    }

    /// Run `code` as `language` and flatten the outcome into the
    /// `{success, output, error}` record. Never fails: every internal fault
    /// becomes `success = false` with the fault's description in `error`.
    pub async fn execute(&self, code: &str, language: &str) -> ExecutionResult {
        let request = ExecutionRequest::new(code, language);
        match self.run(&request).await {
            Ok(outcome) => outcome.into(),
            Err(e) => {
                match &e {
                    Error::UnsupportedLanguage(_) => debug!("Rejected request: {}", e),
                    _ => error!("Code execution failed: {}", e),
                }
                e.into()
            }
        }
    }

    /// Run every tagged, non-blank fenced block of `markdown`, in order.
    pub async fn execute_blocks(&self, markdown: &str) -> Vec<BlockResult> {
        let mut results = Vec::new();
        for block in extract_code_blocks(markdown) {
            if block.language.is_empty() || block.code.trim().is_empty() {
                continue;
            }
            let result = self.execute(&block.code, &block.language).await;
            results.push(BlockResult {
                language: block.language,
                result,
            });
        }
        results
    }

    /// Run a request and report the full outcome.
    ///
    /// Compile and runtime failures are `Ok` outcomes; `Err` is reserved for
    /// unsupported languages and internal faults. The workspace is removed
    /// before this returns, whatever happened.
    pub async fn run(&self, request: &ExecutionRequest) -> Result<Outcome> {
        let language: Language = request.language.parse()?;
        let handler = self.handler(language)?;
        handler.check_tools()?;

        let mut workspace = Workspace::create(&self.config.work_dir).await?;
        let result = self
            .run_pipeline(handler, &mut workspace, &request.code)
            .await;

        if let Err(e) = workspace.cleanup().await {
            warn!("{}", e);
        }

        if let Ok(outcome) = &result {
            info!(
                language = %language,
                status = ?outcome.status,
                elapsed = ?outcome.elapsed,
                "Code execution finished"
            );
        }
        result
    }

    async fn run_pipeline(
        &self,
        handler: &dyn LanguageHandler,
        workspace: &mut Workspace,
        code: &str,
    ) -> Result<Outcome> {
        let mut lifecycle = Lifecycle::new(handler.language());
        let timeout = self.config.timeout();

        let source = handler.write_source(workspace, code).await?;
        for artifact in handler.build_artifacts(&source) {
            workspace.track(artifact);
        }

        if let Some(compile) = handler.compile_command(workspace, &source) {
            lifecycle.advance(ExecutionState::Compiling)?;
            let output = process::run(&compile, timeout).await?;

            if output.timed_out() {
                lifecycle.advance(ExecutionState::TimedOut)?;
                return Ok(self.timed_out(Stage::Compile, String::new(), output));
            }
            if !output.success() {
                lifecycle.advance(ExecutionState::CompileFailed)?;
                return Ok(Outcome {
                    status: ExecutionStatus::CompilationError,
                    stdout: String::new(),
                    elapsed: output.elapsed,
                    stderr: failure_stderr(output),
                });
            }
            lifecycle.advance(ExecutionState::Compiled)?;
        }

        lifecycle.advance(ExecutionState::Running)?;
        let run = handler.run_command(workspace, &source);
        let output = process::run(&run, timeout).await?;

        match output.exit {
            Exit::TimedOut => {
                lifecycle.advance(ExecutionState::TimedOut)?;
                let stdout = output.stdout.clone();
                Ok(self.timed_out(Stage::Run, stdout, output))
            }
            Exit::Code(0) => {
                lifecycle.advance(ExecutionState::Completed)?;
                Ok(Outcome {
                    status: ExecutionStatus::Success,
                    stdout: output.stdout,
                    stderr: output.stderr,
                    elapsed: output.elapsed,
                })
            }
            _ => {
                lifecycle.advance(ExecutionState::RunFailed)?;
                Ok(Outcome {
                    status: ExecutionStatus::RuntimeError,
                    stdout: output.stdout.clone(),
                    elapsed: output.elapsed,
                    stderr: failure_stderr(output),
                })
            }
        }
    }

    fn timed_out(&self, stage: Stage, stdout: String, output: ProcessOutput) -> Outcome {
        Outcome {
            status: ExecutionStatus::Timeout {
                stage,
                secs: self.config.timeout_secs,
            },
            stdout,
            stderr: output.stderr,
            elapsed: output.elapsed,
        }
    }
}

/// Stderr of a failed stage. A process killed by a signal (a segfault, say)
/// often prints nothing, so the signal is reported instead.
fn failure_stderr(output: ProcessOutput) -> String {
    match output.exit {
        Exit::Signal(signal) if output.stderr.trim().is_empty() => {
            format!("Process terminated by signal {}", signal)
        }
        _ => output.stderr,
    }
}
