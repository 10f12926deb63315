//! Commit range resolution.
//!
//! The window for the changelog starts at the last qualifying tag. Lookup
//! failures are expected (fresh repositories, shallow CI clones, patterns
//! that match nothing) and only move the resolver down its fallback chain:
//! pattern-matched tag, then any tag, then the repository's first commit.

use crate::error::{NotifierError, NotifierResult};
use crate::git::GitRepo;
use crate::{log_info, log_warn};

/// Outcome of the tag lookup for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagResolution {
    pub pattern: Option<String>,
    pub resolved_tag: Option<String>,
    pub commit_hash: String,
}

/// Changelog window; `to == None` means HEAD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    pub from: String,
    pub to: Option<String>,
}

impl TagResolution {
    pub fn range(&self) -> CommitRange {
        CommitRange {
            from: self.commit_hash.clone(),
            to: None,
        }
    }

    /// True when neither lookup found a tag and the first commit was used
    pub fn used_first_commit(&self) -> bool {
        self.resolved_tag.is_none()
    }
}

impl std::fmt::Display for CommitRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.from, self.to.as_deref().unwrap_or("HEAD"))
    }
}

/// Resolve the start of the changelog window.
///
/// Only a repository without any commit (or one that cannot be opened) is an
/// error; every tag lookup failure is logged and absorbed.
pub fn resolve_range(repo: &GitRepo, tag_pattern: Option<&str>) -> NotifierResult<TagResolution> {
    let resolution = |tag: Option<String>, commit_hash: String| TagResolution {
        pattern: tag_pattern.map(str::to_string),
        resolved_tag: tag,
        commit_hash,
    };

    if let Some(pattern) = tag_pattern {
        match repo.latest_tag(Some(pattern)) {
            Ok(Some(tag)) => {
                log_info!("Using tag {} matching {}", tag.name, pattern);
                return Ok(resolution(Some(tag.name), tag.commit_hash));
            }
            Ok(None) => log_warn!("No tag matches pattern {}", pattern),
            Err(e) => log_warn!("Tag lookup for pattern {} failed: {}", pattern, e),
        }
    }

    match repo.latest_tag(None) {
        Ok(Some(tag)) => {
            log_info!("Using latest tag {}", tag.name);
            return Ok(resolution(Some(tag.name), tag.commit_hash));
        }
        Ok(None) => log_warn!("Repository has no tags"),
        Err(e) => log_warn!("Latest tag lookup failed: {}", e),
    }

    let first = repo
        .first_commit()
        .map_err(|e| NotifierError::NoStartingPoint(e.to_string()))?;
    log_warn!("Falling back to first commit {}", first);
    Ok(resolution(None, first))
}
