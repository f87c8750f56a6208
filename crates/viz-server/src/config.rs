use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::versions::VERSION_DIR;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to resolve project directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Project directory has no parent to serve from: {0}")]
    NoParent(PathBuf),
}

/// Server Root shared by every responder. Set once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub root: PathBuf,
}

impl ServerConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ServerConfig { root: root.into() }
    }

    /// Serves from the parent of `project_dir`, so the frontend assets and the
    /// generated CSV output sit under one tree.
    pub fn from_project_dir(project_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let project_dir = project_dir.as_ref();
        let resolved = project_dir.canonicalize().map_err(|source| ConfigError::Io {
            path: project_dir.to_path_buf(),
            source,
        })?;

        let root = resolved
            .parent()
            .ok_or_else(|| ConfigError::NoParent(resolved.clone()))?;

        Ok(ServerConfig::new(root))
    }

    pub fn version_dir(&self) -> PathBuf {
        self.root.join(VERSION_DIR)
    }
}
