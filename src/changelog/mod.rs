//! Changelog derivation: commit range → classified records → Slack blocks.

mod config;
mod parser;
mod render;

pub use config::{ChangelogConfig, TypeRule};
pub use parser::{CommitClassifier, CommitRecord, ConventionalCommitParser};
pub use render::{markdown_to_blocks, render_markdown};

use crate::error::{NotifierError, NotifierResult};
use crate::git::{GitRepo, RawCommit};
use crate::log_debug;
use crate::range::CommitRange;
use crate::slack::Block;

/// Keep recognized types only, and drop non-breaking `chore(deps)` commits.
///
/// Order is preserved and applying the filter twice changes nothing.
pub fn filter_commits(records: Vec<CommitRecord>, config: &ChangelogConfig) -> Vec<CommitRecord> {
    records
        .into_iter()
        .filter(|record| config.recognizes(&record.commit_type))
        .filter(|record| record.is_breaking || !record.is_dependency_chore())
        .collect()
}

/// Classify raw commits and apply [`filter_commits`]
pub fn classify_commits(
    commits: &[RawCommit],
    classifier: &dyn CommitClassifier,
    config: &ChangelogConfig,
) -> Vec<CommitRecord> {
    let records: Vec<CommitRecord> = commits
        .iter()
        .filter_map(|commit| classifier.classify(commit))
        .collect();
    let classified = records.len();
    let kept = filter_commits(records, config);
    log_debug!(
        "Classified {} of {} commits, {} kept for the changelog",
        classified,
        commits.len(),
        kept.len()
    );
    kept
}

/// Render the changelog for `range` as Slack blocks
pub struct ChangelogRenderer {
    config: ChangelogConfig,
    classifier: Box<dyn CommitClassifier>,
}

impl ChangelogRenderer {
    pub fn new(config: ChangelogConfig) -> Self {
        Self::with_classifier(config, Box::new(ConventionalCommitParser))
    }

    pub fn with_classifier(config: ChangelogConfig, classifier: Box<dyn CommitClassifier>) -> Self {
        Self { config, classifier }
    }

    pub fn records(&self, repo: &GitRepo, range: &CommitRange) -> NotifierResult<Vec<CommitRecord>> {
        let commits = repo
            .commits_between(&range.from, range.to.as_deref())
            .map_err(NotifierError::Changelog)?;
        Ok(classify_commits(&commits, self.classifier.as_ref(), &self.config))
    }

    pub fn render(&self, repo: &GitRepo, range: &CommitRange) -> NotifierResult<Vec<Block>> {
        let records = self.records(repo, range)?;
        let markdown = render_markdown(&records, &self.config);
        log_debug!("Rendered changelog for {}:\n{}", range, markdown);
        Ok(markdown_to_blocks(&markdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(commit_type: &str, scope: Option<&str>, breaking: bool) -> CommitRecord {
        CommitRecord {
            commit_type: commit_type.into(),
            scope: scope.map(str::to_string),
            subject: format!("{commit_type} change"),
            is_breaking: breaking,
            hash: "abcdef0".into(),
        }
    }

    #[test]
    fn unknown_types_are_dropped() {
        let kept = filter_commits(
            vec![record("feat", None, false), record("style", None, false)],
            &ChangelogConfig::default(),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].commit_type, "feat");
    }

    #[test]
    fn dependency_chores_need_to_be_breaking() {
        let kept = filter_commits(
            vec![
                record("chore", Some("deps"), false),
                record("chore", Some("deps"), true),
                record("chore", Some("release"), false),
            ],
            &ChangelogConfig::default(),
        );
        assert_eq!(kept.len(), 2);
        assert!(kept[0].is_breaking);
        assert_eq!(kept[1].scope.as_deref(), Some("release"));
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = vec![
            record("feat", None, false),
            record("chore", Some("deps"), false),
            record("wip", None, true),
            record("chore", Some("deps"), true),
            record("fix", Some("deps"), false),
        ];
        let config = ChangelogConfig::default();
        let once = filter_commits(records, &config);
        let twice = filter_commits(once.clone(), &config);
        assert_eq!(once, twice);
    }

    #[test]
    fn classification_is_case_insensitive_against_config() {
        let commits = vec![RawCommit {
            hash: "1234567890".into(),
            message: "Feat: shout".into(),
            author: "a".into(),
            timestamp: 0,
        }];
        let config = ChangelogConfig::new(vec![TypeRule::new("FEAT", "Features")]);
        let kept = classify_commits(&commits, &ConventionalCommitParser, &config);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].commit_type, "feat");
    }
}
