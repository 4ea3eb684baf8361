#![forbid(unsafe_code)]

use super::types::{Beat, BeatSnapshot, Dependency};
use std::collections::{BTreeMap, HashMap};

/// Dense index of an interned beat id.
pub(super) type NodeIdx = usize;

#[derive(Clone, Debug)]
pub(super) struct NodeSlot {
    pub(super) id: String,
    pub(super) name: String,
    pub(super) order: i64,
    /// Prerequisite -> number of parallel edges pointing here from it.
    pub(super) dependencies: BTreeMap<NodeIdx, u32>,
    /// Dependent -> number of parallel edges pointing there from here.
    pub(super) dependents: BTreeMap<NodeIdx, u32>,
}

#[derive(Clone, Debug)]
pub(super) struct StoredEdge {
    pub(super) dependency: Dependency,
    pub(super) source: Option<NodeIdx>,
    pub(super) target: Option<NodeIdx>,
}

impl StoredEdge {
    pub(super) fn is_orphan(&self) -> bool {
        self.source.is_none() || self.target.is_none()
    }
}

/// In-memory beat dependency graph for one story project.
///
/// Nodes are interned into an arena; adjacency is kept in both directions and
/// always mirrors the edge records. Edge records are keyed by insertion sequence
/// so listing order is stable across rollbacks.
#[derive(Clone, Debug, Default)]
pub struct BeatGraph {
    pub(super) nodes: Vec<NodeSlot>,
    node_index: HashMap<String, NodeIdx>,
    pub(super) edges: BTreeMap<u64, StoredEdge>,
    edge_index: HashMap<String, u64>,
    next_seq: u64,
}

impl BeatGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(
        beats: impl IntoIterator<Item = Beat>,
        dependencies: impl IntoIterator<Item = Dependency>,
    ) -> Self {
        let mut graph = Self::new();
        graph.initialize(beats, dependencies);
        graph
    }

    /// Replaces all state. Edges go through the same insertion path as live
    /// mutation, without the cycle guard, so legacy cyclic data stays detectable.
    pub fn initialize(
        &mut self,
        beats: impl IntoIterator<Item = Beat>,
        dependencies: impl IntoIterator<Item = Dependency>,
    ) {
        self.nodes.clear();
        self.node_index.clear();
        self.edges.clear();
        self.edge_index.clear();
        self.next_seq = 0;

        for beat in beats {
            if let Some(&idx) = self.node_index.get(&beat.id) {
                let slot = &mut self.nodes[idx];
                slot.name = beat.name;
                slot.order = beat.order;
                continue;
            }
            let idx = self.nodes.len();
            self.node_index.insert(beat.id.clone(), idx);
            self.nodes.push(NodeSlot {
                id: beat.id,
                name: beat.name,
                order: beat.order,
                dependencies: BTreeMap::new(),
                dependents: BTreeMap::new(),
            });
        }

        for dependency in dependencies {
            self.insert_edge_unchecked(dependency);
        }
    }

    /// Records the edge and links both adjacency directions. A record with the
    /// same id is replaced. Only the mutation guard and `initialize` call this.
    pub(super) fn insert_edge_unchecked(&mut self, dependency: Dependency) -> u64 {
        self.detach_edge(&dependency.id);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.attach_edge(seq, dependency);
        seq
    }

    /// Re-inserts a previously detached edge under its original sequence number.
    pub(super) fn restore_edge(&mut self, seq: u64, dependency: Dependency) {
        self.detach_edge(&dependency.id);
        self.attach_edge(seq, dependency);
    }

    /// Removes the edge record and its adjacency entries. `None` if unknown.
    pub(super) fn detach_edge(&mut self, id: &str) -> Option<(u64, Dependency)> {
        let seq = self.edge_index.remove(id)?;
        let stored = self.edges.remove(&seq)?;
        if let (Some(source), Some(target)) = (stored.source, stored.target) {
            unlink(&mut self.nodes[source].dependents, target);
            unlink(&mut self.nodes[target].dependencies, source);
        }
        Some((seq, stored.dependency))
    }

    fn attach_edge(&mut self, seq: u64, dependency: Dependency) {
        let source = self.index_of(&dependency.source_id);
        let target = self.index_of(&dependency.target_id);
        if let (Some(source), Some(target)) = (source, target) {
            *self.nodes[source].dependents.entry(target).or_insert(0) += 1;
            *self.nodes[target].dependencies.entry(source).or_insert(0) += 1;
        }
        self.edge_index.insert(dependency.id.clone(), seq);
        self.edges.insert(
            seq,
            StoredEdge {
                dependency,
                source,
                target,
            },
        );
    }

    /// Mutable access to an edge record for non-endpoint fields only.
    pub(super) fn dependency_mut(&mut self, id: &str) -> Option<&mut Dependency> {
        let seq = self.edge_index.get(id)?;
        self.edges.get_mut(seq).map(|stored| &mut stored.dependency)
    }

    pub(super) fn index_of(&self, id: &str) -> Option<NodeIdx> {
        self.node_index.get(id).copied()
    }

    pub(super) fn node(&self, idx: NodeIdx) -> &NodeSlot {
        &self.nodes[idx]
    }

    pub(super) fn ids_of(&self, indices: impl IntoIterator<Item = NodeIdx>) -> Vec<String> {
        indices
            .into_iter()
            .map(|idx| self.nodes[idx].id.clone())
            .collect()
    }

    pub fn beat_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn dependency_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_beat(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn beat(&self, id: &str) -> Option<BeatSnapshot> {
        self.index_of(id).map(|idx| self.snapshot(idx))
    }

    /// All beats in initialization order.
    pub fn beats(&self) -> Vec<BeatSnapshot> {
        (0..self.nodes.len()).map(|idx| self.snapshot(idx)).collect()
    }

    fn snapshot(&self, idx: NodeIdx) -> BeatSnapshot {
        let slot = &self.nodes[idx];
        BeatSnapshot {
            id: slot.id.clone(),
            name: slot.name.clone(),
            order: slot.order,
            dependencies: self.ids_of(slot.dependencies.keys().copied()),
            dependents: self.ids_of(slot.dependents.keys().copied()),
        }
    }

    pub fn dependency(&self, id: &str) -> Option<&Dependency> {
        let seq = self.edge_index.get(id)?;
        self.edges.get(seq).map(|stored| &stored.dependency)
    }

    /// All edge records in insertion order.
    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.edges.values().map(|stored| &stored.dependency)
    }

    /// Direct prerequisites of `id`; empty when the beat is unknown.
    pub fn dependencies_of(&self, id: &str) -> Vec<String> {
        match self.index_of(id) {
            Some(idx) => self.ids_of(self.nodes[idx].dependencies.keys().copied()),
            None => Vec::new(),
        }
    }

    /// Direct dependents of `id`; empty when the beat is unknown.
    pub fn dependents_of(&self, id: &str) -> Vec<String> {
        match self.index_of(id) {
            Some(idx) => self.ids_of(self.nodes[idx].dependents.keys().copied()),
            None => Vec::new(),
        }
    }
}

fn unlink(links: &mut BTreeMap<NodeIdx, u32>, other: NodeIdx) {
    if let Some(count) = links.get_mut(&other) {
        *count -= 1;
        if *count == 0 {
            links.remove(&other);
        }
    }
}
