/// Live, atomically replaced resource snapshot.
mod resource_store;

/// Immutable record set with an id index.
mod snapshot;

pub use resource_store::{RefreshOutcome, ResourceStore};
pub use snapshot::{fingerprint, Snapshot};
