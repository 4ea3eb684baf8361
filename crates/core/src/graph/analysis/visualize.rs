#![forbid(unsafe_code)]

use super::super::store::BeatGraph;
use super::super::types::{GraphStats, VisualNode, VisualizationData};

impl BeatGraph {
    /// Node/edge summary with computed level and degree counts, for rendering.
    pub fn visualization_data(&self) -> VisualizationData {
        let (_, levels) = self.kahn_levels();
        let nodes = self
            .nodes
            .iter()
            .zip(levels)
            .map(|(slot, level)| VisualNode {
                id: slot.id.clone(),
                name: slot.name.clone(),
                order: slot.order,
                level,
                in_degree: slot.dependencies.len(),
                out_degree: slot.dependents.len(),
            })
            .collect();

        VisualizationData {
            nodes,
            edges: self.dependencies().cloned().collect(),
        }
    }

    pub fn stats(&self) -> GraphStats {
        let (_, levels) = self.kahn_levels();
        GraphStats {
            beats: self.nodes.len(),
            dependencies: self.edges.len(),
            orphan_dependencies: self.edges.values().filter(|e| e.is_orphan()).count(),
            roots: self
                .nodes
                .iter()
                .filter(|slot| slot.dependencies.is_empty())
                .count(),
            max_level: levels.into_iter().flatten().max(),
        }
    }
}
