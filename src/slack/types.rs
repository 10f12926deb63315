//! Slack Web API payloads and the block-kit subset used for announcements.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Slack caps section text at 3000 characters
pub const MAX_SECTION_TEXT: usize = 3000;
/// Slack caps header text at 150 characters
pub const MAX_HEADER_TEXT: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn text(&self) -> &str {
        match self {
            Self::PlainText { text } | Self::Mrkdwn { text } => text,
        }
    }
}

/// Message blocks this crate emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Divider,
    Section { text: TextObject },
}

impl Block {
    /// Header block; text past Slack's limit is cut on a char boundary
    pub fn header(text: &str) -> Self {
        let text: String = text.chars().take(MAX_HEADER_TEXT).collect();
        Self::Header {
            text: TextObject::PlainText { text },
        }
    }

    pub fn divider() -> Self {
        Self::Divider
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self::Section {
            text: TextObject::Mrkdwn { text: text.into() },
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Header { text } | Self::Section { text } => Some(text.text()),
            Self::Divider => None,
        }
    }
}

/// A file as returned by `files.completeUploadExternal`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// One entry of a share list; only the timestamp matters here
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareEntry {
    pub ts: String,
    #[serde(default)]
    pub thread_ts: Option<String>,
}

/// Channel id → messages the file was shared in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shares {
    #[serde(default)]
    pub private: HashMap<String, Vec<ShareEntry>>,
    #[serde(default)]
    pub public: HashMap<String, Vec<ShareEntry>>,
}

/// The parts of a `files.info` file object the rendezvous needs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shares: Option<Shares>,
}

/// Where, if anywhere, a file shows up as shared in a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareLookup {
    NotFound,
    PrivateShare(String),
    PublicShare(String),
}

impl ShareLookup {
    /// Private shares win when both are populated; an empty list counts as absent.
    pub fn for_channel(file: &FileInfo, channel_id: &str) -> Self {
        let Some(shares) = &file.shares else {
            return Self::NotFound;
        };

        let first_ts = |by_channel: &HashMap<String, Vec<ShareEntry>>| {
            by_channel
                .get(channel_id)
                .and_then(|entries| entries.first())
                .map(|entry| entry.ts.clone())
        };

        if let Some(ts) = first_ts(&shares.private) {
            Self::PrivateShare(ts)
        } else if let Some(ts) = first_ts(&shares.public) {
            Self::PublicShare(ts)
        } else {
            Self::NotFound
        }
    }

    /// The thread identifier, if the file has been shared
    pub fn thread_ts(&self) -> Option<&str> {
        match self {
            Self::NotFound => None,
            Self::PrivateShare(ts) | Self::PublicShare(ts) => Some(ts),
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// A posted or updated message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel: String,
    pub ts: String,
}

// Wire envelopes. Slack answers HTTP 200 with `ok: false` for API errors, so
// every response carries `ok` and an optional `error` code.

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub body: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadUrlBody {
    pub upload_url: String,
    pub file_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompleteUploadBody {
    #[serde(default)]
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileInfoBody {
    pub file: FileInfo,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompleteUploadRequest<'a> {
    pub files: Vec<FileRef<'a>>,
    pub channel_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_comment: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FileRef<'a> {
    pub id: &'a str,
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostMessageRequest<'a> {
    pub channel: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<&'a str>,
    pub text: &'a str,
    pub blocks: &'a [Block],
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateMessageRequest<'a> {
    pub channel: &'a str,
    pub ts: &'a str,
    pub text: &'a str,
    pub blocks: &'a [Block],
}
