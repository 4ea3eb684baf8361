#![forbid(unsafe_code)]

use super::super::store::{BeatGraph, NodeIdx};
use std::collections::VecDeque;
use std::ops::Bound;

impl BeatGraph {
    /// True iff adding `from -> to` would close a loop, i.e. `to` already
    /// reaches `from` through zero or more existing edges.
    pub fn would_create_cycle(&self, from: &str, to: &str) -> bool {
        self.cycle_path(from, to).is_some()
    }

    /// The existing path `to -> .. -> from` that an edge `from -> to` would
    /// close, or `None` when the edge is safe.
    pub fn cycle_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        if from == to {
            return Some(vec![from.to_string()]);
        }
        let start = self.index_of(to)?;
        let goal = self.index_of(from)?;

        let mut parent: Vec<Option<NodeIdx>> = vec![None; self.nodes.len()];
        let mut seen = vec![false; self.nodes.len()];
        let mut queue = VecDeque::new();
        seen[start] = true;
        queue.push_back(start);

        while let Some(idx) = queue.pop_front() {
            if idx == goal {
                let mut path = vec![idx];
                let mut cursor = idx;
                while let Some(prev) = parent[cursor] {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                return Some(self.ids_of(path));
            }
            for &next in self.node(idx).dependents.keys() {
                if !seen[next] {
                    seen[next] = true;
                    parent[next] = Some(idx);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Next dependent of `idx` after `after` in index order.
    pub(in crate::graph) fn next_dependent(
        &self,
        idx: NodeIdx,
        after: Option<NodeIdx>,
    ) -> Option<NodeIdx> {
        let dependents = &self.node(idx).dependents;
        match after {
            None => dependents.keys().next().copied(),
            Some(last) => dependents
                .range((Bound::Excluded(last), Bound::Unbounded))
                .next()
                .map(|(&next, _)| next),
        }
    }
}
