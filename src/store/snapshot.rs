use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::types::Resource;

/// An immutable set of resource records plus an id index.
///
/// Snapshots are never mutated after construction; the store publishes a new
/// one on every successful refresh.
#[derive(Debug, Clone)]
pub struct Snapshot {
    records: Vec<Resource>,
    index: HashMap<String, usize>,
    generation: u64,
    fingerprint: String,
}

impl Snapshot {
    /// The snapshot a store starts with: no records, generation 0.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Builds a snapshot from records in source order.
    ///
    /// When several records share an id the first one is indexed; the others
    /// stay in `records` but cannot be looked up.
    pub fn new(records: Vec<Resource>, generation: u64) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let key = record.id.key();
            if index.contains_key(&key) {
                warn!(id = %key, position = i, "duplicate resource id; keeping first occurrence");
                continue;
            }
            index.insert(key, i);
        }
        let fingerprint = fingerprint(&records);
        Self {
            records,
            index,
            generation,
            fingerprint,
        }
    }

    /// All records in source order.
    pub fn records(&self) -> &[Resource] {
        &self.records
    }

    /// Looks up a record by canonical id key.
    pub fn lookup(&self, id: &str) -> Option<&Resource> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Position of the record with the given id key in `records()`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of successful refreshes that preceded this snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// SHA-256 over the record contents, hex encoded.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Computes a SHA-256 fingerprint of a record sequence.
///
/// Order matters: the same records in a different order hash differently,
/// since order drives child ordering in the forest.
pub fn fingerprint(records: &[Resource]) -> String {
    let mut hasher = Sha256::new();
    for record in records {
        hasher.update(record.id.key().as_bytes());
        hasher.update([0u8]);
        if let Some(pid) = &record.pid {
            hasher.update(pid.key().as_bytes());
        }
        hasher.update([0u8]);
        hasher.update(record.name.as_bytes());
        hasher.update([0u8]);
        hasher.update(record.code.as_bytes());
        hasher.update([0xffu8]);
    }
    hex::encode(hasher.finalize())
}
