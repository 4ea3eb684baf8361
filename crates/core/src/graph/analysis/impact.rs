#![forbid(unsafe_code)]

use super::super::store::{BeatGraph, NodeIdx};
use super::super::types::{ImpactAnalysis, Strength};
use super::closure::Direction;
use std::collections::BTreeSet;

const HIGH_IMPACT_SCORE: u32 = 50;

impl BeatGraph {
    /// Blast radius of editing or removing `id`.
    pub fn analyze_impact(&self, id: &str) -> ImpactAnalysis {
        let Some(idx) = self.index_of(id) else {
            return ImpactAnalysis {
                beat_id: id.to_string(),
                directly_affected: Vec::new(),
                transitively_affected: Vec::new(),
                impact_score: 0,
                warnings: Vec::new(),
            };
        };

        let direct: Vec<NodeIdx> = self
            .node(idx)
            .dependents
            .keys()
            .copied()
            .filter(|&next| next != idx)
            .collect();
        let direct_set: BTreeSet<NodeIdx> = direct.iter().copied().collect();
        let transitive: Vec<NodeIdx> = self
            .closure(idx, Direction::Dependents)
            .into_iter()
            .filter(|next| !direct_set.contains(next))
            .collect();

        let impact_score = impact_score(direct.len() + transitive.len(), self.nodes.len());

        let name = &self.node(idx).name;
        let mut warnings = Vec::new();
        let required_dependents: BTreeSet<NodeIdx> = self
            .edges
            .values()
            .filter(|stored| {
                stored.source == Some(idx) && stored.dependency.strength == Strength::Required
            })
            .filter_map(|stored| stored.target)
            .filter(|&target| target != idx)
            .collect();
        if !required_dependents.is_empty() {
            warnings.push(format!(
                "{} beat(s) have a required dependency on '{name}'",
                required_dependents.len()
            ));
        }
        if impact_score > HIGH_IMPACT_SCORE {
            warnings.push(format!(
                "changing '{name}' affects {impact_score}% of the story"
            ));
        }

        ImpactAnalysis {
            beat_id: id.to_string(),
            directly_affected: self.ids_of(direct),
            transitively_affected: self.ids_of(transitive),
            impact_score,
            warnings,
        }
    }
}

/// `round(100 * affected / total)`, rounding halves up, bounded to 100.
fn impact_score(affected: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = (200 * affected + total) / (2 * total);
    score.min(100) as u32
}
