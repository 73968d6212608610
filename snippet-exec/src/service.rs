use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error};

use crate::{
    blocks::BlockResult,
    config::ExecutorConfig,
    executor::CodeExecutor,
    types::{ExecutionResult, Language},
    Result,
};

/// Shared, cloneable front of a [`CodeExecutor`] that caps how many
/// executions run at once.
#[derive(Clone)]
pub struct CodeExecutionService {
    executor: Arc<CodeExecutor>,
    semaphore: Arc<Semaphore>,
}

impl CodeExecutionService {
    pub fn new(max_concurrent_executions: usize, config: ExecutorConfig) -> Result<Self> {
        let executor = CodeExecutor::new(config)?;

        Ok(Self {
            executor: Arc::new(executor),
            semaphore: Arc::new(Semaphore::new(max_concurrent_executions)),
        })
    }

    pub async fn execute(&self, code: &str, language: &str) -> ExecutionResult {
        // Acquire execution permit
        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                error!("Failed to acquire execution permit: {}", e);
                return ExecutionResult::failure(format!(
                    "Failed to acquire execution permit: {}",
                    e
                ));
            }
        };

        debug!("Starting code execution for language: {}", language);
        self.executor.execute(code, language).await
    }

    /// Blocks of one document run one after another under a single permit.
    pub async fn execute_blocks(&self, markdown: &str) -> Vec<BlockResult> {
        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                error!("Failed to acquire execution permit: {}", e);
                return Vec::new();
            }
        };

        self.executor.execute_blocks(markdown).await
    }

    pub fn supported_languages(&self) -> Vec<Language> {
        self.executor.supported_languages()
    }

    pub fn get_available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::skip_if_not_available;
    use crate::tests::fixtures::code_samples::PYTHON_HELLO;
    use crate::tests::utils::test_config;

    #[tokio::test]
    async fn test_concurrent_executions() -> Result<()> {
        if skip_if_not_available(&["python3"]) {
            return Ok(());
        }
        let root = assert_fs::TempDir::new().unwrap();
        let service = CodeExecutionService::new(2, test_config(root.path()))?;

        let mut handles = vec![];
        for i in 0..4 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .execute(&format!("print('run {}')", i), "python")
                    .await
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.unwrap();
            assert!(result.success, "{}", result.error);
            assert_eq!(result.output, format!("run {}\n", i));
        }
        assert_eq!(service.get_available_slots(), 2);

        let result = service.execute(PYTHON_HELLO, "Python").await;
        assert!(result.success);
        Ok(())
    }

    #[tokio::test]
    async fn test_execution_limit() -> Result<()> {
        let max_executions = 2;
        let service = CodeExecutionService::new(max_executions, ExecutorConfig::default())?;

        assert_eq!(service.get_available_slots(), max_executions);
        assert_eq!(service.supported_languages().len(), 4);
        Ok(())
    }
}
