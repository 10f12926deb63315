use std::path::{Path, PathBuf};

use crate::error::{NotifierError, NotifierResult};
use crate::log_debug;

/// Absolute form of `directory`, resolved against the current working directory
pub fn resolve_directory(directory: &Path) -> NotifierResult<PathBuf> {
    if directory.is_absolute() {
        Ok(directory.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(directory))
    }
}

/// List every entry of the build-output directory as an absolute path.
///
/// Fails with [`NotifierError::DirectoryNotFound`] when the directory is
/// missing and [`NotifierError::NotADirectory`] when the path is a file.
/// The listing is not recursive and keeps the order the filesystem
/// returns.
pub async fn locate_artifacts(directory: &Path) -> NotifierResult<Vec<PathBuf>> {
    let directory = resolve_directory(directory)?;

    match tokio::fs::metadata(&directory).await {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => return Err(NotifierError::NotADirectory { path: directory }),
        Err(_) => return Err(NotifierError::DirectoryNotFound { path: directory }),
    }

    let mut entries = tokio::fs::read_dir(&directory).await?;
    let mut artifacts = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        artifacts.push(entry.path());
    }

    log_debug!(
        "Found {} artifacts in {}",
        artifacts.len(),
        directory.display()
    );
    Ok(artifacts)
}
