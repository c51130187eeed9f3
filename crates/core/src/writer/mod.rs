//! Artifact persistence.
//!
//! This module provides the `ArtifactWriter` trait and a file system
//! implementation that stores each report payload as `<dir>/<name>.json`.
//!
//! # Features
//!
//! - Deterministic target path per artifact name, so re-runs overwrite
//! - Write to a temporary sibling, then rename over the target
//! - Staging files orphaned by an aborted write are swept by `validate`
//! - Automatic destination directory creation
//! - SHA-256 checksum of every saved payload
//!
//! # Example
//!
//! ```ignore
//! use axiom_query_core::writer::{ArtifactWriter, FsArtifactWriter};
//!
//! let writer = FsArtifactWriter::new("/var/lib/axiom-query");
//! let saved = writer.write("enrollment", br#"{"rows":[]}"#).await?;
//! println!("Saved {} bytes to {}", saved.size_bytes, saved.path.display());
//! ```

mod error;
mod fs_writer;
mod traits;

pub use error::WriterError;
pub use fs_writer::FsArtifactWriter;
pub use traits::{ArtifactWriter, SavedArtifact};
