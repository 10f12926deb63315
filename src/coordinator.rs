//! Upload-and-rendezvous.
//!
//! Slack accepts an upload immediately but shares the files into the channel
//! out of band. The message that carries the files, and so the thread id the
//! announcement hangs off, only becomes visible once `files.info` reports a
//! share for the channel. The coordinator uploads once, then polls that
//! lookup under a fixed budget.

use std::path::PathBuf;

use crate::error::{NotifierError, NotifierResult};
use crate::rendezvous::{PollOutcome, PollPolicy, poll_until};
use crate::slack::{MessagingPlatform, ShareLookup};
use crate::{log_debug, log_info, log_warn};

/// Remote identity of an upload; `thread_id` is set once the share shows up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub file_id: String,
    pub thread_id: Option<String>,
}

pub struct UploadCoordinator<'a, P: MessagingPlatform + ?Sized> {
    platform: &'a P,
    policy: PollPolicy,
}

impl<'a, P: MessagingPlatform + ?Sized> UploadCoordinator<'a, P> {
    pub fn new(platform: &'a P, policy: PollPolicy) -> Self {
        Self { platform, policy }
    }

    /// Upload `files` to `channel_id` and wait for the thread they landed in.
    ///
    /// Errors with [`NotifierError::UploadFailed`] if the first file comes back
    /// without an id (no polling happens then), and with
    /// [`NotifierError::ThreadNotResolved`] once the poll budget is spent.
    pub async fn upload_and_link_thread(
        &self,
        files: &[PathBuf],
        channel_id: &str,
        title: Option<&str>,
    ) -> NotifierResult<UploadResult> {
        let mut result = self.upload(files, channel_id, title).await?;
        let thread_id = self.await_thread(&result.file_id, channel_id).await?;
        result.thread_id = Some(thread_id);
        Ok(result)
    }

    /// Phase 1: one batched upload
    pub async fn upload(
        &self,
        files: &[PathBuf],
        channel_id: &str,
        title: Option<&str>,
    ) -> NotifierResult<UploadResult> {
        log_info!("Uploading {} files to {}", files.len(), channel_id);
        let uploaded = self.platform.upload_files(channel_id, title, files).await?;

        let file_id = uploaded
            .first()
            .and_then(|file| file.id.clone())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                NotifierError::UploadFailed(format!(
                    "no file id in upload response ({} files returned)",
                    uploaded.len()
                ))
            })?;

        log_debug!("Upload accepted, tracking file {}", file_id);
        Ok(UploadResult {
            file_id,
            thread_id: None,
        })
    }

    /// Phase 2: poll `files.info` until the file is shared into the channel
    pub async fn await_thread(&self, file_id: &str, channel_id: &str) -> NotifierResult<String> {
        let platform = self.platform;
        let outcome = poll_until(
            self.policy,
            |attempt| async move {
                match platform.file_info(file_id).await {
                    Ok(file) => ShareLookup::for_channel(&file, channel_id),
                    Err(e) => {
                        log_warn!("Share lookup attempt {} failed: {}", attempt, e);
                        ShareLookup::NotFound
                    }
                }
            },
            ShareLookup::is_found,
        )
        .await;

        match outcome {
            PollOutcome::Ready { value, attempts } => {
                let thread_id = value.thread_ts().map(str::to_string).ok_or_else(|| {
                    NotifierError::ThreadNotResolved {
                        file_id: file_id.to_string(),
                        attempts,
                    }
                })?;
                log_info!(
                    "File {} shared as {:?} after {} attempts",
                    file_id,
                    value,
                    attempts
                );
                Ok(thread_id)
            }
            PollOutcome::Exhausted { attempts } => Err(NotifierError::ThreadNotResolved {
                file_id: file_id.to_string(),
                attempts,
            }),
        }
    }
}
