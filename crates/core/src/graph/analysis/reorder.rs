#![forbid(unsafe_code)]

use super::super::store::BeatGraph;
use super::super::types::{Positions, ReorderCheck};
use super::closure::Direction;

impl BeatGraph {
    /// Checks whether moving `id` to `new_position` keeps every transitive
    /// prerequisite strictly before it and every transitive dependent strictly
    /// after it. Beats without a position in `current_orders` are not judged.
    pub fn is_valid_reorder(
        &self,
        id: &str,
        new_position: i64,
        current_orders: &Positions,
    ) -> ReorderCheck {
        let Some(idx) = self.index_of(id) else {
            return ReorderCheck {
                valid: false,
                reasons: vec![format!("beat '{id}' is not part of the graph")],
            };
        };
        let name = &self.node(idx).name;
        let mut reasons = Vec::new();

        for prereq in self.closure(idx, Direction::Prerequisites) {
            let slot = self.node(prereq);
            if let Some(&position) = current_orders.get(&slot.id)
                && position >= new_position
            {
                reasons.push(format!(
                    "'{}' must come before '{name}' but is at position {position}",
                    slot.name
                ));
            }
        }

        for dependent in self.closure(idx, Direction::Dependents) {
            let slot = self.node(dependent);
            if let Some(&position) = current_orders.get(&slot.id)
                && position <= new_position
            {
                reasons.push(format!(
                    "'{}' depends on '{name}' but is at position {position}",
                    slot.name
                ));
            }
        }

        ReorderCheck {
            valid: reasons.is_empty(),
            reasons,
        }
    }
}
