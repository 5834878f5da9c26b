use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::snapshot::Snapshot;
use crate::errors::Result;
use crate::sources::ResourceSource;
use crate::types::Resource;

/// Summary of a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    pub generation: u64,
    pub record_count: usize,
    pub fingerprint: String,
    /// `false` when the fetched records hash the same as the previous snapshot.
    pub changed: bool,
}

/// Holds the live resource snapshot.
///
/// Readers load the current `Arc<Snapshot>` without blocking. Refreshes are
/// serialized: each one fetches and publishes while holding `refresh_lock`, so
/// the refresh that completes last is the one readers see. A failed fetch
/// publishes nothing.
pub struct ResourceStore {
    current: ArcSwap<Snapshot>,
    refresh_lock: Mutex<()>,
}

impl ResourceStore {
    /// Creates a store holding an empty snapshot.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::empty()),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Returns the live snapshot. The returned `Arc` stays consistent even if
    /// a refresh publishes a newer one meanwhile.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Looks up a record in the live snapshot by canonical id key.
    pub fn lookup_by_id(&self, id: &str) -> Option<Resource> {
        self.current.load().lookup(id).cloned()
    }

    /// Fetches the full record set from `source` and publishes it.
    ///
    /// On error the previous snapshot stays in place and the error is returned.
    pub async fn refresh(&self, source: &dyn ResourceSource) -> Result<RefreshOutcome> {
        let _guard = self.refresh_lock.lock().await;
        let previous = self.current.load_full();
        let source_name = source.describe();

        debug!(source = %source_name, generation = previous.generation(), "refreshing resources");
        let records = match source.fetch().await {
            Ok(records) => records,
            Err(e) => {
                warn!(source = %source_name, error = %e, "refresh failed; keeping previous snapshot");
                return Err(e);
            }
        };

        let snapshot = Snapshot::new(records, previous.generation() + 1);
        let outcome = RefreshOutcome {
            generation: snapshot.generation(),
            record_count: snapshot.len(),
            fingerprint: snapshot.fingerprint().to_string(),
            changed: snapshot.fingerprint() != previous.fingerprint(),
        };
        self.current.store(Arc::new(snapshot));

        info!(
            source = %source_name,
            generation = outcome.generation,
            records = outcome.record_count,
            changed = outcome.changed,
            "resource snapshot published"
        );
        Ok(outcome)
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}
