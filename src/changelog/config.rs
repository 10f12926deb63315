use serde::{Deserialize, Serialize};

/// One recognized commit type and the changelog section it renders under
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TypeRule {
    #[serde(rename = "type")]
    pub commit_type: String,
    pub section: String,
}

impl TypeRule {
    pub fn new(commit_type: &str, section: &str) -> Self {
        Self {
            commit_type: commit_type.to_string(),
            section: section.to_string(),
        }
    }
}

/// Recognized commit types, in the order their sections are rendered.
///
/// Commits whose type is missing here never reach the changelog.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ChangelogConfig {
    #[serde(default = "default_types")]
    pub types: Vec<TypeRule>,
}

fn default_types() -> Vec<TypeRule> {
    vec![
        TypeRule::new("feat", "Features"),
        TypeRule::new("fix", "Bug Fixes"),
        TypeRule::new("perf", "Performance Improvements"),
        TypeRule::new("revert", "Reverts"),
        TypeRule::new("refactor", "Code Refactoring"),
        TypeRule::new("docs", "Documentation"),
        TypeRule::new("chore", "Miscellaneous Chores"),
    ]
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            types: default_types(),
        }
    }
}

impl ChangelogConfig {
    pub fn new(types: Vec<TypeRule>) -> Self {
        let mut config = Self { types };
        config.normalize();
        config
    }

    /// Lowercase and trim type names; a repeated type keeps its first rule.
    pub fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.types.retain_mut(|rule| {
            rule.commit_type = rule.commit_type.trim().to_lowercase();
            seen.insert(rule.commit_type.clone())
        });
    }

    /// Section title for a commit type, matched case-insensitively
    pub fn section_for(&self, commit_type: &str) -> Option<&str> {
        let commit_type = commit_type.to_lowercase();
        self.types
            .iter()
            .find(|rule| rule.commit_type == commit_type)
            .map(|rule| rule.section.as_str())
    }

    pub fn recognizes(&self, commit_type: &str) -> bool {
        self.section_for(commit_type).is_some()
    }

    /// Distinct section titles in rendering order
    pub fn sections(&self) -> Vec<&str> {
        let mut sections: Vec<&str> = Vec::new();
        for rule in &self.types {
            if !sections.contains(&rule.section.as_str()) {
                sections.push(&rule.section);
            }
        }
        sections
    }
}
