//! Mock artifact writer for testing.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::writer::{ArtifactWriter, SavedArtifact, WriterError};

/// A recorded write attempt for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedWrite {
    /// Artifact name.
    pub name: String,
    /// Payload handed to the writer.
    pub payload: Vec<u8>,
    /// Whether the write succeeded.
    pub success: bool,
}

/// Mock implementation of the ArtifactWriter trait.
///
/// Keeps artifacts in memory keyed by name, so a second write replaces the
/// first exactly like the file system writer does.
///
/// # Example
///
/// ```rust,ignore
/// let writer = MockArtifactWriter::new();
/// writer.fail_writes_for("beta").await;
///
/// writer.write("alpha", b"{}").await?;
/// assert_eq!(writer.artifact("alpha").await, Some(b"{}".to_vec()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockArtifactWriter {
    /// Every write attempt, in order.
    writes: Arc<RwLock<Vec<RecordedWrite>>>,
    /// Current artifact contents.
    artifacts: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    /// Names whose writes fail.
    failing: Arc<RwLock<HashSet<String>>>,
    /// Simulated write duration.
    write_delay: Arc<RwLock<Duration>>,
}

impl MockArtifactWriter {
    /// Create a new mock writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write of `name` fail.
    pub async fn fail_writes_for(&self, name: &str) {
        self.failing.write().await.insert(name.to_string());
    }

    /// Let writes of every name succeed again.
    pub async fn clear_failures(&self) {
        self.failing.write().await.clear();
    }

    /// Set the simulated write duration.
    pub async fn set_write_delay(&self, delay: Duration) {
        *self.write_delay.write().await = delay;
    }

    /// Get all recorded write attempts.
    pub async fn recorded_writes(&self) -> Vec<RecordedWrite> {
        self.writes.read().await.clone()
    }

    /// Get the number of write attempts.
    pub async fn write_count(&self) -> usize {
        self.writes.read().await.len()
    }

    /// Names written successfully, sorted.
    pub async fn written_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .writes
            .read()
            .await
            .iter()
            .filter(|w| w.success)
            .map(|w| w.name.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Current content of an artifact.
    pub async fn artifact(&self, name: &str) -> Option<Vec<u8>> {
        self.artifacts.read().await.get(name).cloned()
    }

    fn path_for(name: &str) -> PathBuf {
        PathBuf::from(format!("/mock/{}.json", name))
    }
}

#[async_trait]
impl ArtifactWriter for MockArtifactWriter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn write(&self, name: &str, payload: &[u8]) -> Result<SavedArtifact, WriterError> {
        let delay = *self.write_delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let success = !self.failing.read().await.contains(name);
        self.writes.write().await.push(RecordedWrite {
            name: name.to_string(),
            payload: payload.to_vec(),
            success,
        });

        if !success {
            return Err(WriterError::write_failed(
                Self::path_for(name),
                std::io::Error::other("simulated write failure"),
            ));
        }

        self.artifacts
            .write()
            .await
            .insert(name.to_string(), payload.to_vec());

        Ok(SavedArtifact {
            path: Self::path_for(name),
            size_bytes: payload.len() as u64,
            checksum: format!("{:x}", Sha256::digest(payload)),
        })
    }

    async fn validate(&self) -> Result<(), WriterError> {
        Ok(())
    }
}
