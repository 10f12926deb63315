use anyhow::{Context, Result};
use git2::{Repository, Sort};
use serde::Serialize;

use crate::log_debug;

/// A commit as read from the repository, before classification
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub timestamp: i64,
}

/// Retrieves the commits reachable from `to` but not from `from`.
///
/// Commits come back in `git log` order, newest first. `to` defaults to HEAD.
///
/// # Arguments
///
/// * `repo` - The git repository
/// * `from` - The starting Git reference (exclusive).
/// * `to` - The ending Git reference (inclusive), or `None` for HEAD.
pub fn commits_between(repo: &Repository, from: &str, to: Option<&str>) -> Result<Vec<RawCommit>> {
    let from_commit = repo
        .revparse_single(from)
        .and_then(|obj| obj.peel_to_commit())
        .with_context(|| format!("Failed to resolve range start {from}"))?;
    let to_commit = match to {
        Some(to) => repo.revparse_single(to)?.peel_to_commit()?,
        None => repo.head()?.peel_to_commit()?,
    };

    log_debug!(
        "Walking commits {}..{}",
        from_commit.id(),
        to.unwrap_or("HEAD")
    );

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    revwalk.push(to_commit.id())?;
    revwalk.hide(from_commit.id())?;

    let commits = revwalk
        .map(|id| {
            let commit = repo.find_commit(id?)?;
            Ok(RawCommit {
                hash: commit.id().to_string(),
                message: commit.message().unwrap_or_default().to_string(),
                author: commit.author().name().unwrap_or_default().to_string(),
                timestamp: commit.time().seconds(),
            })
        })
        .collect::<Result<Vec<_>, git2::Error>>()?;

    log_debug!("Found {} commits in range", commits.len());
    Ok(commits)
}
