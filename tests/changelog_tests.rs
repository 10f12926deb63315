#![allow(clippy::unwrap_used)]

use ci_notifier::changelog::{ChangelogConfig, ChangelogRenderer, TypeRule};
use ci_notifier::range::resolve_range;
use ci_notifier::slack::Block;

use test_utils::{commit, open, setup_git_repo, tag_head};

#[test]
fn renders_only_commits_after_the_tag() {
    let (dir, git_repo) = setup_git_repo();
    let repo = open(&dir);
    commit(&repo, "feat: shipped before the tag", 10);
    tag_head(&repo, "v1.2.0");
    commit(&repo, "feat(player): add subtitles", 20);
    commit(&repo, "fix: crash on resume", 30);
    commit(&repo, "chore(deps): bump webpack", 40);
    commit(&repo, "update readme", 50);

    let range = resolve_range(&git_repo, Some("v*")).unwrap().range();
    let renderer = ChangelogRenderer::new(ChangelogConfig::default());

    let records = renderer.records(&git_repo, &range).unwrap();
    let subjects: Vec<&str> = records.iter().map(|r| r.subject.as_str()).collect();
    assert_eq!(subjects, vec!["crash on resume", "add subtitles"]);

    let blocks = renderer.render(&git_repo, &range).unwrap();
    let texts: Vec<&str> = blocks.iter().filter_map(Block::text).collect();
    assert_eq!(texts.len(), 4);
    assert_eq!(texts[0], "*Features*");
    assert!(texts[1].starts_with("• *player:* add subtitles"));
    assert_eq!(texts[2], "*Bug Fixes*");
    assert!(texts[3].contains("crash on resume"));
    assert!(!texts.iter().any(|t| t.contains("shipped before the tag")));
}

#[test]
fn breaking_dependency_bump_is_kept() {
    let (dir, git_repo) = setup_git_repo();
    let repo = open(&dir);
    tag_head(&repo, "v0.1.0");
    commit(&repo, "chore(deps)!: require node 20", 10);
    commit(&repo, "chore(deps): bump lodash", 20);

    let range = resolve_range(&git_repo, None).unwrap().range();
    let records = ChangelogRenderer::new(ChangelogConfig::default())
        .records(&git_repo, &range)
        .unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_breaking);
}

#[test]
fn custom_sections_limit_the_output() {
    let (dir, git_repo) = setup_git_repo();
    let repo = open(&dir);
    tag_head(&repo, "v0.1.0");
    commit(&repo, "feat: visible", 10);
    commit(&repo, "fix: hidden", 20);

    let config = ChangelogConfig::new(vec![TypeRule::new("feat", "What's New")]);
    let range = resolve_range(&git_repo, None).unwrap().range();
    let blocks = ChangelogRenderer::new(config)
        .render(&git_repo, &range)
        .unwrap();
    let texts: Vec<&str> = blocks.iter().filter_map(Block::text).collect();
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0], "*What's New*");
    assert!(!texts[1].contains("hidden"));
}

#[test]
fn nothing_to_announce_renders_no_blocks() {
    let (dir, git_repo) = setup_git_repo();
    let repo = open(&dir);
    tag_head(&repo, "v0.1.0");
    commit(&repo, "wip", 10);

    let range = resolve_range(&git_repo, None).unwrap().range();
    let blocks = ChangelogRenderer::new(ChangelogConfig::default())
        .render(&git_repo, &range)
        .unwrap();
    assert!(blocks.is_empty());
}
