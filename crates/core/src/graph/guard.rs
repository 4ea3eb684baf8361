#![forbid(unsafe_code)]

use super::error::MutationError;
use super::store::BeatGraph;
use super::types::{Dependency, DependencyUpdate};

impl BeatGraph {
    /// Adds an edge unless it would close a cycle. On error the graph is unchanged.
    ///
    /// Endpoints are not required to exist; an edge naming an unknown beat is
    /// recorded and later surfaces as an `orphan` finding.
    pub fn add_edge(&mut self, dependency: Dependency) -> Result<(), MutationError> {
        if self.dependency(&dependency.id).is_some() {
            return Err(MutationError::DuplicateDependency { id: dependency.id });
        }
        self.guard_endpoints(&dependency.source_id, &dependency.target_id)?;
        self.insert_edge_unchecked(dependency);
        Ok(())
    }

    /// Removing an edge can never introduce a cycle, so this is unguarded.
    pub fn remove_edge(&mut self, id: &str) -> Option<Dependency> {
        self.detach_edge(id).map(|(_, dependency)| dependency)
    }

    /// Applies `update` to the edge `id` and returns the resulting record.
    ///
    /// An endpoint change detaches the edge, re-checks the new endpoints and
    /// either attaches the new edge or restores the original one untouched.
    pub fn update_edge(
        &mut self,
        id: &str,
        update: DependencyUpdate,
    ) -> Result<Dependency, MutationError> {
        let Some(current) = self.dependency(id).cloned() else {
            return Err(MutationError::UnknownDependency { id: id.to_string() });
        };

        let mut next = current.clone();
        if let Some(source_id) = update.source_id {
            next.source_id = source_id;
        }
        if let Some(target_id) = update.target_id {
            next.target_id = target_id;
        }
        if let Some(dep_type) = update.dep_type {
            next.dep_type = dep_type;
        }
        if let Some(strength) = update.strength {
            next.strength = strength;
        }
        if let Some(description) = update.description {
            next.description = description;
        }

        let endpoints_changed =
            next.source_id != current.source_id || next.target_id != current.target_id;
        if !endpoints_changed {
            if let Some(record) = self.dependency_mut(id) {
                record.dep_type = next.dep_type;
                record.strength = next.strength;
                record.description = next.description.clone();
            }
            return Ok(next);
        }

        let Some((seq, original)) = self.detach_edge(id) else {
            return Err(MutationError::UnknownDependency { id: id.to_string() });
        };
        if let Err(err) = self.guard_endpoints(&next.source_id, &next.target_id) {
            // Nothing else touched the graph since the detach (we hold `&mut self`),
            // so the original edge is still acyclic.
            self.restore_edge(seq, original);
            return Err(err);
        }
        self.restore_edge(seq, next.clone());
        Ok(next)
    }

    fn guard_endpoints(&self, source_id: &str, target_id: &str) -> Result<(), MutationError> {
        match self.cycle_path(source_id, target_id) {
            Some(path) => Err(MutationError::Cycle {
                source_id: source_id.to_string(),
                target_id: target_id.to_string(),
                path,
            }),
            None => Ok(()),
        }
    }
}
