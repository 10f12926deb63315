use crate::git::commit::{self, RawCommit};
use crate::git::tags::{self, TagRef};
use crate::log_debug;
use anyhow::Result;
use git2::Repository;
use std::path::{Path, PathBuf};

/// Represents a Git repository and provides methods for interacting with it.
#[derive(Debug, Clone)]
pub struct GitRepo {
    repo_path: PathBuf,
}

impl GitRepo {
    /// Creates a new `GitRepo` instance from a local path.
    pub fn new(repo_path: &Path) -> Self {
        Self {
            repo_path: repo_path.to_path_buf(),
        }
    }

    /// Open the repository at the stored path
    pub fn open_repo(&self) -> Result<Repository, git2::Error> {
        Repository::open(&self.repo_path)
    }

    /// Returns the repository path
    pub fn repo_path(&self) -> &PathBuf {
        &self.repo_path
    }

    /// Most recent tag reachable from HEAD whose name matches `pattern` (any tag if `None`)
    pub fn latest_tag(&self, pattern: Option<&str>) -> Result<Option<TagRef>, git2::Error> {
        let repo = self.open_repo()?;
        let tag = tags::latest_tag(&repo, pattern)?;
        log_debug!("Latest tag for {:?}: {:?}", pattern, tag);
        Ok(tag)
    }

    /// Hash of the repository's root commit
    pub fn first_commit(&self) -> Result<String, git2::Error> {
        let repo = self.open_repo()?;
        tags::first_commit(&repo)
    }

    /// Commits in `from..to`, newest first; `to` defaults to HEAD
    pub fn commits_between(&self, from: &str, to: Option<&str>) -> Result<Vec<RawCommit>> {
        let repo = self.open_repo()?;
        commit::commits_between(&repo, from, to)
    }
}
