// Slack messaging platform: the operations the notifier consumes and a Web API client

mod client;
mod error;
mod types;

use async_trait::async_trait;
use std::path::PathBuf;

pub use client::SlackClient;
pub use error::SlackError;
pub use types::{
    Block, FileInfo, MAX_HEADER_TEXT, MAX_SECTION_TEXT, MessageRef, ShareEntry, ShareLookup,
    Shares, TextObject, UploadedFile,
};

/// The remote operations a release announcement needs.
///
/// [`SlackClient`] is the production implementation; tests substitute an
/// in-memory recorder.
#[async_trait]
pub trait MessagingPlatform: Send + Sync {
    /// Upload every file in one batch and share it to `channel_id`.
    ///
    /// Returns the per-file results in upload order. The share into the
    /// channel completes asynchronously on Slack's side.
    async fn upload_files(
        &self,
        channel_id: &str,
        title: Option<&str>,
        files: &[PathBuf],
    ) -> Result<Vec<UploadedFile>, SlackError>;

    async fn file_info(&self, file_id: &str) -> Result<FileInfo, SlackError>;

    async fn post_message(
        &self,
        channel_id: &str,
        thread_ts: Option<&str>,
        text: &str,
        blocks: &[Block],
    ) -> Result<MessageRef, SlackError>;

    async fn update_message(
        &self,
        channel_id: &str,
        ts: &str,
        text: &str,
        blocks: &[Block],
    ) -> Result<MessageRef, SlackError>;
}
