use clap::ValueEnum;
use strum_macros::{Display, EnumString};

use crate::error::NotifierResult;
use crate::log_info;
use crate::slack::{Block, MessageRef, MessagingPlatform};

/// How the announcement reaches the thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PublishMode {
    /// Reply in the thread created by the file upload
    #[default]
    Post,
    /// Overwrite the message at the thread id; re-running replaces instead of duplicating
    Update,
}

/// Final release message for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub header: String,
    pub changelog: Vec<Block>,
    pub channel_id: String,
    pub thread_id: String,
}

impl Announcement {
    pub fn new(
        header: impl Into<String>,
        changelog: Vec<Block>,
        channel_id: impl Into<String>,
        thread_id: impl Into<String>,
    ) -> Self {
        Self {
            header: header.into(),
            changelog,
            channel_id: channel_id.into(),
            thread_id: thread_id.into(),
        }
    }

    /// Header, divider, then the changelog
    pub fn blocks(&self) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(self.changelog.len() + 2);
        blocks.push(Block::header(&self.header));
        blocks.push(Block::divider());
        blocks.extend(self.changelog.iter().cloned());
        blocks
    }
}

/// Post or update the announcement; exactly one remote message mutation
pub async fn publish<P: MessagingPlatform + ?Sized>(
    platform: &P,
    announcement: &Announcement,
    mode: PublishMode,
) -> NotifierResult<MessageRef> {
    let blocks = announcement.blocks();
    let message = match mode {
        PublishMode::Post => {
            platform
                .post_message(
                    &announcement.channel_id,
                    Some(&announcement.thread_id),
                    &announcement.header,
                    &blocks,
                )
                .await?
        }
        PublishMode::Update => {
            platform
                .update_message(
                    &announcement.channel_id,
                    &announcement.thread_id,
                    &announcement.header,
                    &blocks,
                )
                .await?
        }
    };

    log_info!(
        "Announcement {} to {} at {}",
        match mode {
            PublishMode::Post => "posted",
            PublishMode::Update => "updated",
        },
        message.channel,
        message.ts
    );
    Ok(message)
}
