//! File system artifact writer.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::error::WriterError;
use super::traits::{ArtifactWriter, SavedArtifact};

/// Artifact file extension (payloads are JSON result sets).
const ARTIFACT_EXTENSION: &str = "json";

/// Suffix of the hidden file a payload is staged in before the rename.
const STAGING_SUFFIX: &str = ".json.partial";

/// Stores each artifact as `<directory>/<name>.json`.
pub struct FsArtifactWriter {
    directory: PathBuf,
}

impl FsArtifactWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Target path for an artifact name. Same name, same path.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", name, ARTIFACT_EXTENSION))
    }

    /// Hidden sibling the payload is staged in before the rename.
    fn staging_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!(".{}{}", name, STAGING_SUFFIX))
    }

    /// Deletes staging files left by writes that were aborted mid-flight.
    /// Only safe while no write is running.
    async fn remove_stale_staging(&self) -> Result<usize, WriterError> {
        let mut entries = fs::read_dir(&self.directory).await?;
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if !(file_name.starts_with('.') && file_name.ends_with(STAGING_SUFFIX)) {
                continue;
            }

            let path = entry.path();
            match fs::remove_file(&path).await {
                Ok(()) => {
                    debug!(path = %path.display(), "Removed stale staging file");
                    removed += 1;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove staging file"),
            }
        }

        Ok(removed)
    }

    async fn ensure_directory(&self) -> Result<(), WriterError> {
        match fs::metadata(&self.directory).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(WriterError::NotADirectory {
                path: self.directory.clone(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.directory).await.map_err(|e| {
                    WriterError::DirectoryCreationFailed {
                        path: self.directory.clone(),
                        source: e,
                    }
                })
            }
            Err(e) => Err(WriterError::Io(e)),
        }
    }

    async fn write_staged(path: &Path, payload: &[u8]) -> Result<(), WriterError> {
        let mut file = File::create(path)
            .await
            .map_err(|e| WriterError::write_failed(path.to_path_buf(), e))?;
        file.write_all(payload)
            .await
            .map_err(|e| WriterError::write_failed(path.to_path_buf(), e))?;
        file.sync_all()
            .await
            .map_err(|e| WriterError::write_failed(path.to_path_buf(), e))?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactWriter for FsArtifactWriter {
    fn name(&self) -> &str {
        "fs"
    }

    async fn write(&self, name: &str, payload: &[u8]) -> Result<SavedArtifact, WriterError> {
        self.ensure_directory().await?;

        let destination = self.artifact_path(name);
        let staging = self.staging_path(name);

        if let Err(e) = Self::write_staged(&staging, payload).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&staging, &destination).await {
            let _ = fs::remove_file(&staging).await;
            return Err(WriterError::ReplaceFailed {
                destination,
                source: e,
            });
        }

        Ok(SavedArtifact {
            path: destination,
            size_bytes: payload.len() as u64,
            checksum: format!("{:x}", Sha256::digest(payload)),
        })
    }

    /// Also sweeps staging files an interrupted previous run left behind.
    async fn validate(&self) -> Result<(), WriterError> {
        self.ensure_directory().await?;
        let removed = self.remove_stale_staging().await?;
        if removed > 0 {
            warn!(
                directory = %self.directory.display(),
                removed,
                "Removed staging files from an interrupted run"
            );
        }
        Ok(())
    }
}
