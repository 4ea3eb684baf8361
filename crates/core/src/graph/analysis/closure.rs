#![forbid(unsafe_code)]

use super::super::store::{BeatGraph, NodeIdx};
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::graph) enum Direction {
    Prerequisites,
    Dependents,
}

impl BeatGraph {
    /// Every beat `id` transitively depends on, nearest first.
    pub fn all_prerequisites(&self, id: &str) -> Vec<String> {
        match self.index_of(id) {
            Some(idx) => self.ids_of(self.closure(idx, Direction::Prerequisites)),
            None => Vec::new(),
        }
    }

    /// Every beat that transitively depends on `id`, nearest first.
    pub fn all_dependents(&self, id: &str) -> Vec<String> {
        match self.index_of(id) {
            Some(idx) => self.ids_of(self.closure(idx, Direction::Dependents)),
            None => Vec::new(),
        }
    }

    /// Breadth-first closure from `start`, excluding `start` itself.
    pub(in crate::graph) fn closure(&self, start: NodeIdx, direction: Direction) -> Vec<NodeIdx> {
        let mut seen = vec![false; self.nodes.len()];
        let mut out = Vec::new();
        let mut queue = VecDeque::new();
        seen[start] = true;
        queue.push_back(start);

        while let Some(idx) = queue.pop_front() {
            let slot = self.node(idx);
            let neighbours = match direction {
                Direction::Prerequisites => &slot.dependencies,
                Direction::Dependents => &slot.dependents,
            };
            for &next in neighbours.keys() {
                if seen[next] {
                    continue;
                }
                seen[next] = true;
                out.push(next);
                queue.push_back(next);
            }
        }
        out
    }
}
