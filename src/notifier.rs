//! One notifier run: resolve the range, build the changelog and find the
//! artifacts, upload and wait for the thread, then publish.

use std::path::PathBuf;

use crate::artifacts::locate_artifacts;
use crate::changelog::ChangelogRenderer;
use crate::config::Config;
use crate::coordinator::{UploadCoordinator, UploadResult};
use crate::error::{NotifierError, NotifierResult};
use crate::git::GitRepo;
use crate::publisher::{Announcement, PublishMode, publish};
use crate::range::{TagResolution, resolve_range};
use crate::slack::{MessageRef, MessagingPlatform};
use crate::{log_debug, log_info};

pub const DEFAULT_HEADER: &str = "CI Notifier";

/// Everything a run needs, fixed at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyOptions {
    pub channel: String,
    pub directory: PathBuf,
    pub tag: Option<String>,
    pub header: String,
    pub title: Option<String>,
    pub mode: PublishMode,
    pub repo_path: PathBuf,
}

impl NotifyOptions {
    pub fn new(channel: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            channel: channel.into(),
            directory: directory.into(),
            tag: None,
            header: DEFAULT_HEADER.to_string(),
            title: None,
            mode: PublishMode::default(),
            repo_path: PathBuf::from("."),
        }
    }
}

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyReport {
    pub resolution: TagResolution,
    pub artifact_count: usize,
    pub upload: UploadResult,
    pub message: MessageRef,
}

pub struct Notifier<'a, P: MessagingPlatform + ?Sized> {
    platform: &'a P,
    options: NotifyOptions,
    config: Config,
}

impl<'a, P: MessagingPlatform + ?Sized> Notifier<'a, P> {
    pub fn new(platform: &'a P, options: NotifyOptions, config: Config) -> Self {
        Self {
            platform,
            options,
            config,
        }
    }

    /// Run once. Nothing is uploaded unless both the changelog and the
    /// artifact listing succeed.
    pub async fn run(&self) -> NotifierResult<NotifyReport> {
        let repo = GitRepo::new(&self.options.repo_path);
        let resolution = resolve_range(&repo, self.options.tag.as_deref())?;
        let range = resolution.range();
        log_info!("Changelog range {}", range);

        let renderer = ChangelogRenderer::new(self.config.changelog.clone());
        let changelog_task = tokio::task::spawn_blocking(move || renderer.render(&repo, &range));
        let changelog = async { changelog_task.await? };

        let (changelog, artifacts) =
            tokio::try_join!(changelog, locate_artifacts(&self.options.directory))?;
        log_debug!(
            "{} changelog blocks, {} artifacts",
            changelog.len(),
            artifacts.len()
        );

        let coordinator =
            UploadCoordinator::new(self.platform, self.config.rendezvous.poll_policy());
        let upload = coordinator
            .upload_and_link_thread(
                &artifacts,
                &self.options.channel,
                self.options.title.as_deref(),
            )
            .await?;

        let thread_id = upload.thread_id.clone().ok_or_else(|| {
            NotifierError::ThreadNotResolved {
                file_id: upload.file_id.clone(),
                attempts: 0,
            }
        })?;
        let announcement = Announcement::new(
            self.options.header.clone(),
            changelog,
            self.options.channel.clone(),
            thread_id,
        );
        let message = publish(self.platform, &announcement, self.options.mode).await?;

        Ok(NotifyReport {
            resolution,
            artifact_count: artifacts.len(),
            upload,
            message,
        })
    }
}
