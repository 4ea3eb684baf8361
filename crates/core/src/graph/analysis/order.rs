#![forbid(unsafe_code)]

use super::super::store::{BeatGraph, NodeIdx};
use super::super::types::TopologicalOrder;
use std::collections::{HashMap, VecDeque};

impl BeatGraph {
    /// Kahn's algorithm with longest-path levels. Beats with no prerequisites
    /// sit at level 0; every other beat sits one above its deepest prerequisite.
    pub fn topological_order(&self) -> TopologicalOrder {
        let (order, levels) = self.kahn_levels();
        let has_valid_order = order.len() == self.nodes.len();
        let cycles = if has_valid_order {
            Vec::new()
        } else {
            self.detect_cycles()
        };

        let levels = levels
            .iter()
            .enumerate()
            .filter_map(|(idx, level)| level.map(|level| (self.node(idx).id.clone(), level)))
            .collect::<HashMap<_, _>>();

        TopologicalOrder {
            order: self.ids_of(order),
            levels,
            has_valid_order,
            cycles,
        }
    }

    /// All beats sorted by `(level, current order)`. The sort is stable, so
    /// ties keep initialization order. Beats stuck in a cycle go last.
    pub fn suggest_optimal_order(&self) -> Vec<String> {
        let (_, levels) = self.kahn_levels();
        let mut indices: Vec<NodeIdx> = (0..self.nodes.len()).collect();
        indices.sort_by_key(|&idx| (levels[idx].unwrap_or(usize::MAX), self.node(idx).order));
        self.ids_of(indices)
    }

    /// Emission order plus a level per beat; `None` for beats never emitted.
    pub(in crate::graph) fn kahn_levels(&self) -> (Vec<NodeIdx>, Vec<Option<usize>>) {
        let count = self.nodes.len();
        let mut pending: Vec<usize> = self
            .nodes
            .iter()
            .map(|slot| slot.dependencies.len())
            .collect();
        let mut depth = vec![0usize; count];
        let mut placed = vec![false; count];
        let mut order = Vec::with_capacity(count);

        let mut queue: VecDeque<NodeIdx> = (0..count).filter(|&idx| pending[idx] == 0).collect();
        while let Some(idx) = queue.pop_front() {
            placed[idx] = true;
            order.push(idx);
            for &next in self.node(idx).dependents.keys() {
                depth[next] = depth[next].max(depth[idx] + 1);
                pending[next] -= 1;
                if pending[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        let levels = (0..count)
            .map(|idx| placed[idx].then_some(depth[idx]))
            .collect();
        (order, levels)
    }
}
