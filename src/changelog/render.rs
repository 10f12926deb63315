//! Markdown rendering of classified commits and lowering to Slack blocks.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use std::fmt::Write;

use super::config::ChangelogConfig;
use super::parser::CommitRecord;
use crate::slack::{Block, MAX_SECTION_TEXT};

/// Render records as `### Section` headings with bullet lists.
///
/// Sections follow the configuration order; bullets keep the order of
/// `records`. Records whose type is not configured are skipped.
pub fn render_markdown(records: &[CommitRecord], config: &ChangelogConfig) -> String {
    let mut markdown = String::new();

    for section in config.sections() {
        let entries: Vec<&CommitRecord> = records
            .iter()
            .filter(|r| config.section_for(&r.commit_type) == Some(section))
            .collect();
        if entries.is_empty() {
            continue;
        }

        if !markdown.is_empty() {
            markdown.push('\n');
        }
        let _ = writeln!(markdown, "### {}\n", escape_markdown(section));
        for record in entries {
            markdown.push_str("* ");
            if record.is_breaking {
                markdown.push_str("**BREAKING** ");
            }
            if let Some(scope) = &record.scope {
                let _ = write!(markdown, "**{}:** ", escape_markdown(scope));
            }
            let _ = writeln!(
                markdown,
                "{} ({})",
                escape_markdown(&record.subject),
                record.short_hash()
            );
        }
    }

    markdown
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '#' | '<' | '>' | '~') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Slack mrkdwn reserves these three characters
fn escape_mrkdwn(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Lower markdown into Slack section blocks.
///
/// Headings become one bold section each, every top-level list becomes one
/// section of bullet lines (split to stay under Slack's section limit), and
/// stray paragraphs become sections of their own.
pub fn markdown_to_blocks(markdown: &str) -> Vec<Block> {
    let mut lowering = Lowering::default();
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH);
    for event in parser {
        lowering.event(event);
    }
    lowering.blocks
}

#[derive(Default)]
struct Lowering {
    blocks: Vec<Block>,
    inline: String,
    list_lines: Vec<String>,
    list_depth: usize,
    link_targets: Vec<String>,
}

impl Lowering {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.inline.push_str(&escape_mrkdwn(&text)),
            Event::Code(code) => {
                let _ = write!(self.inline, "`{}`", escape_mrkdwn(&code));
            }
            Event::SoftBreak => self.inline.push(' '),
            Event::HardBreak => self.inline.push('\n'),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::List(_) => {
                if self.list_depth > 0 {
                    self.finish_item_line();
                }
                self.list_depth += 1;
            }
            Tag::Item => {
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.inline = format!("{indent}• ");
            }
            Tag::Strong => self.inline.push('*'),
            Tag::Emphasis => self.inline.push('_'),
            Tag::Strikethrough => self.inline.push('~'),
            Tag::Link { dest_url, .. } => {
                self.link_targets.push(dest_url.to_string());
                self.inline.push('<');
                self.inline.push_str(&dest_url);
                self.inline.push('|');
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                let text = std::mem::take(&mut self.inline);
                let text = text.trim();
                if !text.is_empty() {
                    self.blocks.push(Block::markdown(format!("*{text}*")));
                }
            }
            TagEnd::Paragraph if self.list_depth == 0 => self.flush_paragraph(),
            TagEnd::Item => self.finish_item_line(),
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0 {
                    let lines = std::mem::take(&mut self.list_lines);
                    self.push_chunked(&lines);
                }
            }
            TagEnd::Strong => self.inline.push('*'),
            TagEnd::Emphasis => self.inline.push('_'),
            TagEnd::Strikethrough => self.inline.push('~'),
            TagEnd::Link => {
                if self.link_targets.pop().is_some() {
                    self.inline.push('>');
                }
            }
            _ => {}
        }
    }

    fn finish_item_line(&mut self) {
        let line = std::mem::take(&mut self.inline);
        let line = line.trim_end();
        if !line.trim().is_empty() && line.trim() != "•" {
            self.list_lines.push(line.to_string());
        }
    }

    fn flush_paragraph(&mut self) {
        let text = std::mem::take(&mut self.inline);
        if !text.trim().is_empty() {
            self.push_chunked(&[text.trim().to_string()]);
        }
    }

    /// Pack lines into as few sections as the size limit allows
    fn push_chunked(&mut self, lines: &[String]) {
        let mut chunk = String::new();
        for line in lines {
            let line = truncate_chars(line, MAX_SECTION_TEXT);
            let needed = if chunk.is_empty() {
                line.chars().count()
            } else {
                chunk.chars().count() + 1 + line.chars().count()
            };
            if needed > MAX_SECTION_TEXT && !chunk.is_empty() {
                self.blocks.push(Block::markdown(std::mem::take(&mut chunk)));
            }
            if !chunk.is_empty() {
                chunk.push('\n');
            }
            chunk.push_str(&line);
        }
        if !chunk.is_empty() {
            self.blocks.push(Block::markdown(chunk));
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::TypeRule;

    fn record(commit_type: &str, scope: Option<&str>, subject: &str) -> CommitRecord {
        CommitRecord {
            commit_type: commit_type.into(),
            scope: scope.map(str::to_string),
            subject: subject.into(),
            is_breaking: false,
            hash: "abcdef1234567890".into(),
        }
    }

    #[test]
    fn renders_sections_in_config_order() {
        let records = vec![
            record("fix", None, "stop crash"),
            record("feat", Some("ui"), "dark mode"),
        ];
        let markdown = render_markdown(&records, &ChangelogConfig::default());
        assert_eq!(
            markdown,
            "### Features\n\n* **ui:** dark mode (abcdef1)\n\n### Bug Fixes\n\n* stop crash (abcdef1)\n"
        );
    }

    #[test]
    fn sections_shared_by_several_types_render_once() {
        let config = ChangelogConfig::new(vec![
            TypeRule::new("feat", "Changes"),
            TypeRule::new("fix", "Changes"),
        ]);
        let records = vec![record("fix", None, "a"), record("feat", None, "b")];
        let markdown = render_markdown(&records, &config);
        assert_eq!(markdown.matches("### Changes").count(), 1);
        // source order within the section
        assert!(markdown.find("* a").unwrap_or(usize::MAX) < markdown.find("* b").unwrap_or(0));
    }

    #[test]
    fn breaking_entries_are_flagged() {
        let mut breaking = record("feat", None, "new auth");
        breaking.is_breaking = true;
        let markdown = render_markdown(&[breaking], &ChangelogConfig::default());
        assert!(markdown.contains("* **BREAKING** new auth"));
    }

    #[test]
    fn lowering_makes_heading_and_list_blocks() {
        let blocks = markdown_to_blocks("### Features\n\n* **ui:** dark mode (abc)\n* tabs (def)\n");
        assert_eq!(
            blocks,
            vec![
                Block::markdown("*Features*"),
                Block::markdown("• *ui:* dark mode (abc)\n• tabs (def)"),
            ]
        );
    }

    #[test]
    fn lowering_escapes_mrkdwn_control_characters() {
        let blocks = markdown_to_blocks("* a &amp; b \\<tag\\>\n");
        assert_eq!(blocks, vec![Block::markdown("• a &amp; b &lt;tag&gt;")]);
    }

    #[test]
    fn escaped_subjects_survive_the_round_trip() {
        let markdown = render_markdown(
            &[record("fix", None, "handle *bold* and _under_ in names")],
            &ChangelogConfig::default(),
        );
        let blocks = markdown_to_blocks(&markdown);
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[1].text(),
            Some("• handle *bold* and _under_ in names (abcdef1)")
        );
    }

    #[test]
    fn long_lists_are_split_under_the_section_limit() {
        let line = "x".repeat(1000);
        let markdown = format!("* {line}\n* {line}\n* {line}\n* {line}\n");
        let blocks = markdown_to_blocks(&markdown);
        assert_eq!(blocks.len(), 2);
        for block in &blocks {
            assert!(block.text().map_or(0, |t| t.chars().count()) <= MAX_SECTION_TEXT);
        }
    }

    #[test]
    fn links_use_slack_syntax() {
        let blocks = markdown_to_blocks("see [docs](https://example.com)\n");
        assert_eq!(blocks, vec![Block::markdown("see <https://example.com|docs>")]);
    }

    #[test]
    fn empty_markdown_yields_no_blocks() {
        assert!(markdown_to_blocks("").is_empty());
    }
}
