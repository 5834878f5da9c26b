use std::collections::HashSet;

use tracing::trace;

use crate::store::Snapshot;
use crate::types::{Resource, ResourceId};

/// Returns the names from the root down to `resource`, inclusive.
///
/// Parents are found by linear search over `records`. The walk stops when a
/// `pid` is absent or matches no record. If the walk comes back to a record it
/// has already visited, it stops there and treats the last new record as the
/// root, so cyclic input yields a finite path.
pub fn resolve_path(resource: &Resource, records: &[Resource]) -> Vec<String> {
    walk(resource, |pid| records.iter().find(|r| r.id.same_as(pid)))
}

/// Joins path segments with `delimiter`.
pub fn join_path(segments: &[String], delimiter: &str) -> String {
    segments.join(delimiter)
}

/// Resolves paths against a snapshot's id index.
pub struct PathResolver<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> PathResolver<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Same result as [`resolve_path`] over the snapshot's records.
    pub fn resolve(&self, resource: &Resource) -> Vec<String> {
        walk(resource, |pid| self.snapshot.lookup(&pid.key()))
    }

    /// Resolves the path of the record with the given id key, if present.
    pub fn resolve_id(&self, id: &str) -> Option<Vec<String>> {
        self.snapshot.lookup(id).map(|r| self.resolve(r))
    }
}

fn walk<'r, F>(resource: &'r Resource, mut parent_of: F) -> Vec<String>
where
    F: FnMut(&ResourceId) -> Option<&'r Resource>,
{
    let mut segments = vec![resource.name.clone()];
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(resource.id.key());

    let mut current = resource;
    while let Some(pid) = &current.pid {
        let Some(parent) = parent_of(pid) else {
            break;
        };
        if !visited.insert(parent.id.key()) {
            trace!(id = %resource.id, at = %parent.id, "parent cycle; truncating path");
            break;
        }
        segments.push(parent.name.clone());
        current = parent;
    }

    segments.reverse();
    segments
}
