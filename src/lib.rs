//! ci-notifier - announce CI builds in Slack
//!
//! Uploads build artifacts to a channel, waits until Slack has shared them
//! into a message, and publishes a conventional-commit changelog since the
//! last tag into that message's thread.

#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::format_push_string)] // Performance improvement but stylistic
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough
#![allow(clippy::items_after_statements)] // Locally-scoped use statements are fine

pub mod artifacts;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod git;
pub mod logger;
pub mod notifier;
pub mod packaging;
pub mod publisher;
pub mod range;
pub mod rendezvous;
pub mod slack;
pub mod ui;

pub use config::Config;
pub use coordinator::{UploadCoordinator, UploadResult};
pub use error::{NotifierError, NotifierResult};
pub use notifier::{Notifier, NotifyOptions, NotifyReport};
pub use publisher::{Announcement, PublishMode, publish};
pub use range::{CommitRange, TagResolution, resolve_range};
pub use rendezvous::{PollOutcome, PollPolicy, poll_until};
