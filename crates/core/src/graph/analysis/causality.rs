#![forbid(unsafe_code)]

use super::super::store::BeatGraph;

impl BeatGraph {
    /// Linear runs that start at a beat with no prerequisites and continue while
    /// the current beat has exactly one dependent. Single-beat runs are dropped.
    pub fn find_causality_chains(&self) -> Vec<Vec<String>> {
        let mut chains = Vec::new();
        let mut on_chain = vec![false; self.nodes.len()];

        for root in 0..self.nodes.len() {
            if !self.node(root).dependencies.is_empty() {
                continue;
            }

            let mut chain = vec![root];
            on_chain[root] = true;
            let mut current = root;
            while self.node(current).dependents.len() == 1 {
                let Some(next) = self.next_dependent(current, None) else {
                    break;
                };
                if on_chain[next] {
                    break;
                }
                on_chain[next] = true;
                chain.push(next);
                current = next;
            }

            for &idx in &chain {
                on_chain[idx] = false;
            }
            if chain.len() > 1 {
                chains.push(self.ids_of(chain));
            }
        }

        chains
    }
}
