#![allow(clippy::unwrap_used)]

use ci_notifier::error::NotifierError;
use ci_notifier::range::resolve_range;

use test_utils::{commit, head_hash, open, setup_git_repo, setup_temp_dir, tag_head};

#[test]
fn pattern_selects_matching_tag() {
    let (dir, git_repo) = setup_git_repo();
    let repo = open(&dir);
    commit(&repo, "feat: first release", 10);
    tag_head(&repo, "v1.0.0");
    let v1 = head_hash(&repo);
    commit(&repo, "fix: nightly tweak", 20);
    tag_head(&repo, "nightly-42");
    commit(&repo, "feat: more", 30);

    let resolution = resolve_range(&git_repo, Some("v*")).unwrap();
    assert_eq!(resolution.resolved_tag.as_deref(), Some("v1.0.0"));
    assert_eq!(resolution.commit_hash, v1);
    assert_eq!(resolution.pattern.as_deref(), Some("v*"));
}

#[test]
fn newest_tag_wins_without_pattern() {
    let (dir, git_repo) = setup_git_repo();
    let repo = open(&dir);
    commit(&repo, "feat: a", 10);
    tag_head(&repo, "v1.0.0");
    commit(&repo, "feat: b", 20);
    tag_head(&repo, "v1.1.0");
    let newest = head_hash(&repo);

    let resolution = resolve_range(&git_repo, None).unwrap();
    assert_eq!(resolution.resolved_tag.as_deref(), Some("v1.1.0"));
    assert_eq!(resolution.range().from, newest);
}

#[test]
fn unmatched_pattern_falls_back_to_latest_tag() {
    let (dir, git_repo) = setup_git_repo();
    let repo = open(&dir);
    commit(&repo, "feat: a", 10);
    tag_head(&repo, "release-3");
    let tagged = head_hash(&repo);
    commit(&repo, "feat: b", 20);

    let resolution = resolve_range(&git_repo, Some("v*")).unwrap();
    assert_eq!(resolution.resolved_tag.as_deref(), Some("release-3"));
    assert_eq!(resolution.commit_hash, tagged);
}

#[test]
fn untagged_repository_starts_at_first_commit() {
    let (dir, git_repo) = setup_git_repo();
    let repo = open(&dir);
    let first = head_hash(&repo);
    commit(&repo, "feat: a", 10);
    commit(&repo, "fix: b", 20);

    let resolution = resolve_range(&git_repo, Some("v*")).unwrap();
    assert!(resolution.used_first_commit());
    assert_eq!(resolution.commit_hash, first);
    assert_eq!(resolution.range().to_string(), format!("{first}..HEAD"));
}

#[test]
fn tags_off_the_current_branch_are_ignored() {
    let (dir, git_repo) = setup_git_repo();
    let repo = open(&dir);
    let first = head_hash(&repo);

    // Tag a commit on a side branch, then return to the original line
    let base = repo.head().unwrap().peel_to_commit().unwrap();
    let original = repo.head().unwrap().name().unwrap().to_string();
    repo.branch("side", &base, false).unwrap();
    repo.set_head("refs/heads/side").unwrap();
    commit(&repo, "feat: side work", 10);
    tag_head(&repo, "v9.9.9");
    repo.set_head(&original).unwrap();
    repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))
        .unwrap();
    commit(&repo, "feat: main work", 20);

    let resolution = resolve_range(&git_repo, None).unwrap();
    assert!(resolution.resolved_tag.is_none());
    assert_eq!(resolution.commit_hash, first);
}

#[test]
fn directory_without_repository_is_an_error() {
    let (_dir, git_repo) = setup_temp_dir();
    let err = resolve_range(&git_repo, None).unwrap_err();
    assert!(matches!(err, NotifierError::NoStartingPoint(_)));
}
