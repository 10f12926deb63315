//! Conventional-commit classification.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::git::RawCommit;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[A-Za-z]+)(?:\((?P<scope>[^()\r\n]*)\))?(?P<breaking>!)?:\s+(?P<subject>\S.*)$")
        .expect("Failed to compile commit header regex")
});

static BREAKING_FOOTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^BREAKING[ -]CHANGE:").expect("Failed to compile breaking footer regex")
});

/// A classified commit
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Always lowercase
    pub commit_type: String,
    pub scope: Option<String>,
    pub subject: String,
    pub is_breaking: bool,
    pub hash: String,
}

impl CommitRecord {
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }

    /// `chore(deps)` housekeeping that is only worth announcing when it breaks something
    pub fn is_dependency_chore(&self) -> bool {
        self.commit_type == "chore"
            && self
                .scope
                .as_deref()
                .is_some_and(|scope| scope.eq_ignore_ascii_case("deps"))
    }
}

/// Turns a raw commit into a [`CommitRecord`], or `None` if it does not classify
pub trait CommitClassifier: Send + Sync {
    fn classify(&self, commit: &RawCommit) -> Option<CommitRecord>;
}

/// Parses `type(scope)!: subject` headers and `BREAKING CHANGE:` footers
#[derive(Debug, Default, Clone, Copy)]
pub struct ConventionalCommitParser;

impl CommitClassifier for ConventionalCommitParser {
    fn classify(&self, commit: &RawCommit) -> Option<CommitRecord> {
        let header = commit.message.lines().next()?.trim();
        let caps = HEADER.captures(header)?;

        let scope = caps
            .name("scope")
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let is_breaking =
            caps.name("breaking").is_some() || BREAKING_FOOTER.is_match(&commit.message);

        Some(CommitRecord {
            commit_type: caps["type"].to_lowercase(),
            scope,
            subject: caps["subject"].trim().to_string(),
            is_breaking,
            hash: commit.hash.clone(),
        })
    }
}
