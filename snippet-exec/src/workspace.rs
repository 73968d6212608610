use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{error::Error, Result};

/// Scratch directory owned by a single execution.
///
/// Everything the execution creates lives inside it. `cleanup` removes the
/// tracked artifacts and then the directory; if the workspace is dropped
/// before that (panic, cancelled future) the directory is still removed.
pub struct Workspace {
    dir: TempDir,
    id: Uuid,
    artifacts: Vec<PathBuf>,
}

impl Workspace {
    /// Create a fresh workspace under `root`, creating `root` if needed.
    pub async fn create(root: &Path) -> Result<Self> {
        fs::create_dir_all(root).await.map_err(|e| {
            Error::Workspace(format!(
                "Failed to create work directory {}: {}",
                root.display(),
                e
            ))
        })?;

        let dir = tempfile::Builder::new()
            .prefix("snippet-")
            .tempdir_in(root)
            .map_err(|e| Error::Workspace(format!("Failed to create workspace: {}", e)))?;

        debug!("Created workspace at {}", dir.path().display());

        Ok(Self {
            dir,
            id: Uuid::new_v4(),
            artifacts: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// File stem unique to this execution.
    pub fn default_stem(&self) -> String {
        format!("snippet_{}", self.id.simple())
    }

    pub fn source_path(&self, stem: &str, extension: &str) -> PathBuf {
        if extension.is_empty() {
            self.path().join(stem)
        } else {
            self.path().join(format!("{}.{}", stem, extension))
        }
    }

    /// Write `code` to `<stem>.<extension>` and track the file.
    pub async fn write_source(&mut self, stem: &str, extension: &str, code: &str) -> Result<PathBuf> {
        let path = self.source_path(stem, extension);
        fs::write(&path, code).await.map_err(|e| {
            Error::Workspace(format!("Failed to write {}: {}", path.display(), e))
        })?;
        self.track(path.clone());
        Ok(path)
    }

    /// Register a file for removal in `cleanup`.
    pub fn track(&mut self, path: PathBuf) {
        if !self.artifacts.contains(&path) {
            self.artifacts.push(path);
        }
    }

    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    /// Remove every tracked artifact, then the directory itself.
    ///
    /// Missing artifacts are fine: a failed compile never produces its output.
    pub async fn cleanup(self) -> Result<()> {
        for artifact in &self.artifacts {
            match fs::remove_file(artifact).await {
                Ok(()) => debug!("Removed {}", artifact.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove {}: {}", artifact.display(), e),
            }
        }

        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| {
            Error::Workspace(format!(
                "Failed to remove workspace {}: {}",
                path.display(),
                e
            ))
        })
    }
}
