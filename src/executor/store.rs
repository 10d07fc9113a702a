// Concurrency-safe result accumulation

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use super::result::NodeResult;
use crate::node::{Node, NodeId};

/// Shared accumulator for in-flight results.
///
/// Write discipline: exactly one writer per key (the unit of work owning
/// that node), so writes only contend across distinct keys. The executor
/// reads it only after the pool has drained.
#[derive(Default)]
pub struct ResultStore {
    inner: DashMap<NodeId, NodeResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        ResultStore {
            inner: DashMap::new(),
        }
    }

    pub fn insert(&self, id: NodeId, result: NodeResult) {
        let previous = self.inner.insert(id, result);
        debug_assert!(previous.is_none(), "second result written for {id}");
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Produce the caller-facing snapshot, pairing each input node with its
    /// result. Callers must only invoke this after every unit has written.
    pub fn snapshot(&self, nodes: &[Arc<Node>]) -> ResultSet {
        let entries = nodes
            .iter()
            .filter_map(|node| {
                self.inner
                    .get(&node.id())
                    .map(|entry| (node.id(), (node.clone(), entry.value().clone())))
            })
            .collect();
        ResultSet { entries }
    }
}

/// Immutable mapping from node to result, one entry per input node.
#[derive(Debug, Clone)]
pub struct ResultSet {
    entries: HashMap<NodeId, (Arc<Node>, NodeResult)>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, node: &Node) -> Option<&NodeResult> {
        self.get_by_id(node.id())
    }

    pub fn get_by_id(&self, id: NodeId) -> Option<&NodeResult> {
        self.entries.get(&id).map(|(_, result)| result)
    }

    /// Iterate node/result pairs. No ordering is guaranteed.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<Node>, &NodeResult)> {
        self.entries.values().map(|(node, result)| (node, result))
    }

    pub fn failure_count(&self) -> usize {
        self.entries
            .values()
            .filter(|(_, result)| result.is_err())
            .count()
    }

    pub fn ok_count(&self) -> usize {
        self.len() - self.failure_count()
    }
}
