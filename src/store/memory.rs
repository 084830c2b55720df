use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    license::License,
    store::{LicenseStore, RevisionToken, StoreError, StoreResult},
};

#[derive(Default)]
struct Inner {
    licenses: Vec<License>,
    // 0 means the document does not exist yet.
    revision: u64,
}

/// In-memory license store with the same optimistic-concurrency
/// contract as the remote store. Used in tests.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    /// Creates an empty store with no document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with an existing document.
    pub fn with_licenses(licenses: Vec<License>) -> Self {
        Self { inner: Mutex::new(Inner { licenses, revision: 1 }) }
    }
}

#[async_trait]
impl LicenseStore for InMemoryStore {
    async fn load(&self) -> StoreResult<(Vec<License>, Option<RevisionToken>)> {
        let inner = self.inner.lock().await;
        if inner.revision == 0 {
            return Ok((Vec::new(), None));
        }
        Ok((inner.licenses.clone(), Some(RevisionToken(inner.revision.to_string()))))
    }

    async fn save(
        &self,
        licenses: Vec<License>,
        expected_revision: Option<RevisionToken>,
        message: &str,
    ) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;

        let current = if inner.revision == 0 {
            None
        } else {
            Some(RevisionToken(inner.revision.to_string()))
        };
        if expected_revision != current {
            return Err(StoreError::Conflict);
        }

        debug!("Saving {} licenses in memory: {message}", licenses.len());
        inner.licenses = licenses;
        inner.revision += 1;
        Ok(())
    }
}
