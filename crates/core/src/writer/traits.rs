//! Trait definitions for the writer module.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::WriterError;

/// Where and what was written for one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedArtifact {
    /// Final artifact location.
    pub path: PathBuf,
    /// Payload size in bytes.
    pub size_bytes: u64,
    /// SHA-256 of the payload, lowercase hex.
    pub checksum: String,
}

/// Persists report payloads under their artifact names.
///
/// Writing the same name twice must leave only the second payload behind.
#[async_trait]
pub trait ArtifactWriter: Send + Sync {
    /// Returns the name of this writer implementation.
    fn name(&self) -> &str;

    /// Creates or replaces the artifact called `name`.
    async fn write(&self, name: &str, payload: &[u8]) -> Result<SavedArtifact, WriterError>;

    /// Validates that the writer is properly configured and ready.
    async fn validate(&self) -> Result<(), WriterError>;
}
