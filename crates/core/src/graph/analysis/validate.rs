#![forbid(unsafe_code)]

use super::super::store::BeatGraph;
use super::super::types::{
    FindingKind, Positions, Severity, Strength, ValidationFinding, ValidationReport,
};

impl BeatGraph {
    /// Full consistency report against the caller's current linear ordering.
    ///
    /// `optional` edges never produce findings. Edges whose endpoints lack a
    /// position are skipped by the order check.
    pub fn validate(&self, current_orders: &Positions) -> ValidationReport {
        let mut findings = Vec::new();

        for cycle in self.detect_cycles() {
            let mut loop_ids = cycle.clone();
            if let Some(first) = cycle.first() {
                loop_ids.push(first.clone());
            }
            findings.push(ValidationFinding {
                kind: FindingKind::Cycle,
                severity: Severity::Error,
                message: format!("circular dependency: {}", loop_ids.join(" -> ")),
                beat_ids: cycle,
                dependency_id: None,
            });
        }

        for stored in self.edges.values() {
            let dependency = &stored.dependency;
            if stored.is_orphan() {
                let mut missing = Vec::new();
                if stored.source.is_none() {
                    missing.push(dependency.source_id.clone());
                }
                if stored.target.is_none() && dependency.target_id != dependency.source_id {
                    missing.push(dependency.target_id.clone());
                }
                findings.push(ValidationFinding {
                    kind: FindingKind::Orphan,
                    severity: Severity::Error,
                    message: format!(
                        "dependency {} references missing beat(s): {}",
                        dependency.id,
                        missing.join(", ")
                    ),
                    beat_ids: missing,
                    dependency_id: Some(dependency.id.clone()),
                });
                continue;
            }

            let severity = match dependency.strength {
                Strength::Required => Severity::Error,
                Strength::Suggested => Severity::Warning,
                Strength::Optional => continue,
            };
            let (Some(&source_pos), Some(&target_pos)) = (
                current_orders.get(&dependency.source_id),
                current_orders.get(&dependency.target_id),
            ) else {
                continue;
            };
            if source_pos < target_pos {
                continue;
            }

            let (Some(source), Some(target)) = (stored.source, stored.target) else {
                continue;
            };
            findings.push(ValidationFinding {
                kind: FindingKind::OrderViolation,
                severity,
                message: format!(
                    "'{}' must come before '{}' ({} {} dependency)",
                    self.node(source).name,
                    self.node(target).name,
                    dependency.strength.as_str(),
                    dependency.dep_type.as_str()
                ),
                beat_ids: vec![
                    dependency.source_id.clone(),
                    dependency.target_id.clone(),
                ],
                dependency_id: Some(dependency.id.clone()),
            });
        }

        let errors = findings
            .iter()
            .filter(|finding| finding.severity == Severity::Error)
            .count();
        let warnings = findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
            .count();

        ValidationReport {
            ok: errors == 0,
            errors,
            warnings,
            findings,
        }
    }
}
