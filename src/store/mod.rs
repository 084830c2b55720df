pub mod github;
pub mod memory;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::license::License;

/// Opaque marker for the version of the remote document last read.
/// Saves are conditioned on it so a concurrent edit is never clobbered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionToken(pub String);

/// Errors from the license store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote document changed between load and save. The caller
    /// must reload and retry by hand; the store never retries writes.
    #[error("remote document changed since it was last read")]
    Conflict,
    /// The remote store could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
    /// The document content is not valid JSON for the expected layout.
    #[error("failed to decode license document: {0}")]
    Decode(#[from] serde_json::Error),
    /// The remote store answered with something unexpected.
    #[error("unexpected response from remote store: {0}")]
    Api(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The persisted document layout: a single top-level `licenses` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseDocument {
    /// All license records, in insertion order.
    pub licenses: Vec<License>,
}

/// Versioned access to the license collection.
///
/// Mutating callers do a full read-modify-write round trip: `load`,
/// change the collection in memory, then `save` with the revision
/// token observed at load time.
#[automock]
#[async_trait]
pub trait LicenseStore: Send + Sync {
    /// Fetches the current collection and its revision token. A
    /// document that does not exist yet yields an empty collection and
    /// no token.
    async fn load(&self) -> StoreResult<(Vec<License>, Option<RevisionToken>)>;

    /// Writes the full collection back, conditioned on
    /// `expected_revision`. Fails with [`StoreError::Conflict`] if the
    /// remote document changed in between. `message` describes the
    /// change for the store's history.
    async fn save(
        &self,
        licenses: Vec<License>,
        expected_revision: Option<RevisionToken>,
        message: &str,
    ) -> StoreResult<()>;
}
