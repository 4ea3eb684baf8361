#![forbid(unsafe_code)]

use crate::ProjectId;
use bg_core::graph::BeatGraph;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Beat graphs keyed by project. Each graph has its own lock, so work on one
/// project never waits for another.
#[derive(Debug, Default)]
pub(crate) struct ProjectRegistry {
    graphs: Mutex<HashMap<ProjectId, Arc<Mutex<BeatGraph>>>>,
}

impl ProjectRegistry {
    fn slot(&self, project: &ProjectId) -> Option<Arc<Mutex<BeatGraph>>> {
        let graphs = self.graphs.lock().expect("project registry mutex poisoned");
        graphs.get(project).cloned()
    }

    fn slot_or_create(&self, project: &ProjectId) -> Arc<Mutex<BeatGraph>> {
        let mut graphs = self.graphs.lock().expect("project registry mutex poisoned");
        Arc::clone(graphs.entry(project.clone()).or_default())
    }

    /// Runs `f` with the project's graph locked for the whole call.
    /// `None` when the project has never been initialized.
    pub(crate) fn with_graph<T>(
        &self,
        project: &ProjectId,
        f: impl FnOnce(&mut BeatGraph) -> T,
    ) -> Option<T> {
        let slot = self.slot(project)?;
        let mut graph = slot.lock().expect("beat graph mutex poisoned");
        Some(f(&mut graph))
    }

    /// Like `with_graph`, creating an empty graph for unknown projects.
    pub(crate) fn with_graph_or_create<T>(
        &self,
        project: &ProjectId,
        f: impl FnOnce(&mut BeatGraph) -> T,
    ) -> T {
        let slot = self.slot_or_create(project);
        let mut graph = slot.lock().expect("beat graph mutex poisoned");
        f(&mut graph)
    }

    pub(crate) fn project_ids(&self) -> Vec<ProjectId> {
        let graphs = self.graphs.lock().expect("project registry mutex poisoned");
        let mut ids = graphs.keys().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }
}
