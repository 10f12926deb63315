use std::path::PathBuf;

use crate::config::ConfigError;
use crate::slack::SlackError;

/// Errors that terminate a notifier run.
///
/// Tag lookup misses never show up here; the range resolver absorbs them and
/// falls back to the next candidate.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Artifact directory {} does not exist", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Artifact path {} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error(
        "Thread id not resolved: exhausted {attempts} share-lookup attempts for file {file_id}"
    )]
    ThreadNotResolved { file_id: String, attempts: u32 },

    #[error("No usable starting commit: {0}")]
    NoStartingPoint(String),

    #[error("Changelog generation failed: {0:#}")]
    Changelog(anyhow::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Slack error: {0}")]
    Platform(#[from] SlackError),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type NotifierResult<T> = Result<T, NotifierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_not_resolved_names_the_budget() {
        let err = NotifierError::ThreadNotResolved {
            file_id: "F123".into(),
            attempts: 20,
        };
        assert_eq!(
            err.to_string(),
            "Thread id not resolved: exhausted 20 share-lookup attempts for file F123"
        );
    }

    #[test]
    fn directory_not_found_names_the_path() {
        let err = NotifierError::DirectoryNotFound {
            path: PathBuf::from("/tmp/missing-dist"),
        };
        assert!(err.to_string().contains("/tmp/missing-dist"));
    }

    #[test]
    fn upload_and_rendezvous_errors_read_differently() {
        let upload = NotifierError::UploadFailed("no file id".into()).to_string();
        let thread = NotifierError::ThreadNotResolved {
            file_id: "F1".into(),
            attempts: 20,
        }
        .to_string();
        assert_ne!(upload, thread);
        assert!(upload.starts_with("Upload failed"));
    }
}
