//! repo::workspace
//!
//! Locating repositories under a base directory.
//!
//! A repository is a subdirectory carrying a `.mygit` marker directory with
//! a `HEAD` file inside. Lookups are containment-checked before touching
//! the filesystem so a crafted name cannot address anything outside the
//! base directory.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::core::config::EngineConfig;
use crate::error::{Error, Result};
use crate::repo::Repository;
use crate::tool::ToolRunner;

/// The marker directory that makes a directory a repository.
const MARKER_DIR: &str = ".mygit";

/// A base directory holding repositories.
#[derive(Debug, Clone)]
pub struct Workspace {
    base: PathBuf,
    runner: ToolRunner,
}

impl Workspace {
    /// A workspace over `base` using the given runner for all repositories
    /// it opens.
    pub fn new(base: impl Into<PathBuf>, runner: ToolRunner) -> Self {
        Self {
            base: base.into(),
            runner,
        }
    }

    /// A workspace configured from an [`EngineConfig`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the config has no base directory.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let base = config
            .base_dir
            .clone()
            .ok_or_else(|| Error::invalid_input("no base_dir configured"))?;
        Ok(Self::new(base, ToolRunner::from_config(config)))
    }

    /// The base directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// List repository names under the base directory, sorted.
    ///
    /// Only directories carrying the marker count. A missing or unreadable
    /// base directory lists as empty rather than failing: serving no
    /// repositories is a state, not an error.
    pub async fn repositories(&self) -> Vec<String> {
        let mut dir = match tokio::fs::read_dir(&self.base).await {
            Ok(dir) => dir,
            Err(e) => {
                warn!(base = %self.base.display(), error = %e, "cannot read base directory");
                return Vec::new();
            }
        };
        let mut names = Vec::new();
        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "error enumerating base directory");
                    break;
                }
            };
            let path = entry.path();
            if !is_dir(&path).await || !is_dir(&path.join(MARKER_DIR)).await {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => debug!(path = %path.display(), "skipping non-UTF-8 repository name"),
            }
        }
        names.sort();
        names
    }

    /// Open the named repository.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the name resolves outside the base
    /// directory, and `NotFound` when the directory, its marker, or the
    /// marker's `HEAD` file is missing.
    pub async fn open(&self, name: &str) -> Result<Repository> {
        let dir = self.contained_path(name)?;
        if !is_dir(&dir).await {
            return Err(Error::not_found(format!("repository '{name}'")));
        }
        let marker = dir.join(MARKER_DIR);
        if !is_dir(&marker).await || !is_file(&marker.join("HEAD")).await {
            return Err(Error::not_found(format!(
                "'{name}' is not a valid repository"
            )));
        }
        Ok(Repository::at(dir, self.runner.clone()))
    }

    /// Join `name` onto the base and normalize lexically (the target may
    /// not exist yet), refusing any result that escapes the base.
    fn contained_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() {
            return Err(Error::invalid_input("repository name cannot be empty"));
        }
        let mut normalized = PathBuf::new();
        for component in self.base.join(name).components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if !normalized.pop() {
                        return Err(Error::invalid_input(format!(
                            "repository name '{name}' escapes the base directory"
                        )));
                    }
                }
                other => normalized.push(other),
            }
        }
        if !normalized.starts_with(&self.base) {
            return Err(Error::invalid_input(format!(
                "repository name '{name}' escapes the base directory"
            )));
        }
        Ok(normalized)
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn workspace() -> Workspace {
        Workspace::new("/srv/repos", ToolRunner::new())
    }

    #[test]
    fn plain_name_contained() {
        let dir = workspace().contained_path("project").unwrap();
        assert_eq!(dir, PathBuf::from("/srv/repos/project"));
    }

    #[test]
    fn traversal_rejected() {
        let err = workspace().contained_path("../outside").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(workspace().contained_path("a/../../outside").is_err());
    }

    #[test]
    fn absolute_name_rejected() {
        assert!(workspace().contained_path("/etc").is_err());
    }

    #[test]
    fn empty_name_rejected() {
        assert!(workspace().contained_path("").is_err());
    }

    #[test]
    fn internal_dotdot_that_stays_inside_allowed() {
        let dir = workspace().contained_path("a/../b").unwrap();
        assert_eq!(dir, PathBuf::from("/srv/repos/b"));
    }
}
