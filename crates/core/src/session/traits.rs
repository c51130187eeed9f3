//! Trait definitions for the session module.

use async_trait::async_trait;

use super::types::{Session, SessionError};

/// Something that can log in to the query service.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Returns the name of this provider implementation.
    fn name(&self) -> &str;

    /// Logs in and returns an authorized session.
    async fn establish(&self) -> Result<Session, SessionError>;
}
