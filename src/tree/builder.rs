use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::types::Resource;

/// A resource together with the nodes that name it as their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub resource: Resource,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Depth-first search for the node with the given id key, including `self`.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.resource.id.key() == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

// Deep chains would otherwise recurse once per level on drop.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Ordered root nodes built from a record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    pub roots: Vec<TreeNode>,
}

impl Forest {
    /// Total number of nodes across all trees.
    pub fn len(&self) -> usize {
        self.roots.iter().map(TreeNode::size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Finds a node anywhere in the forest by id key.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// Builds a forest from records.
///
/// Each record's node is appended to its parent's children in record order.
/// A record whose `pid` is absent, names no known id, or names itself is a
/// root. Records on a parent cycle are kept: the cycle is cut at the member
/// that comes first in record order, which becomes a root.
///
/// When ids repeat, parent links resolve to the first record with that id.
pub fn build_forest(records: &[Resource]) -> Forest {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        index.entry(record.id.key()).or_insert(i);
    }

    let mut parent: Vec<Option<usize>> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            record
                .pid
                .as_ref()
                .and_then(|pid| index.get(&pid.key()).copied())
                .filter(|&p| p != i)
        })
        .collect();

    break_cycles(&mut parent);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (i, p) in parent.iter().enumerate() {
        match p {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    // Assemble owned nodes bottom-up without recursion.
    let mut built: Vec<Option<TreeNode>> = vec![None; records.len()];
    for &root in &roots {
        let mut stack: Vec<(usize, bool)> = vec![(root, false)];
        while let Some((i, expanded)) = stack.pop() {
            if expanded {
                let kids = children[i]
                    .iter()
                    .filter_map(|&c| built[c].take())
                    .collect();
                built[i] = Some(TreeNode {
                    resource: records[i].clone(),
                    children: kids,
                });
            } else {
                stack.push((i, true));
                for &c in children[i].iter().rev() {
                    stack.push((c, false));
                }
            }
        }
    }

    Forest {
        roots: roots.iter().filter_map(|&r| built[r].take()).collect(),
    }
}

/// Clears one parent link on every cycle so that each record reaches a root.
fn break_cycles(parent: &mut [Option<usize>]) {
    let mut state = vec![Visit::Unvisited; parent.len()];
    for start in 0..parent.len() {
        if state[start] != Visit::Unvisited {
            continue;
        }
        let mut chain: Vec<usize> = Vec::new();
        let mut current = Some(start);
        while let Some(i) = current {
            match state[i] {
                Visit::Done => break,
                Visit::InProgress => {
                    if let Some(pos) = chain.iter().position(|&c| c == i) {
                        if let Some(&cut) = chain[pos..].iter().min() {
                            trace!(position = cut, "breaking parent cycle");
                            parent[cut] = None;
                        }
                    }
                    break;
                }
                Visit::Unvisited => {
                    state[i] = Visit::InProgress;
                    chain.push(i);
                    current = parent[i];
                }
            }
        }
        for i in chain {
            state[i] = Visit::Done;
        }
    }
}
