#![forbid(unsafe_code)]

use std::collections::HashMap;

/// Caller-supplied position of each beat in its current linear ordering.
pub type Positions = HashMap<String, i64>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DependencyType {
    Sequential,
    Parallel,
    Causal,
}

impl DependencyType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
            Self::Causal => "causal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "sequential" => Some(Self::Sequential),
            "parallel" => Some(Self::Parallel),
            "causal" => Some(Self::Causal),
            _ => None,
        }
    }
}

/// How strictly the ordering implied by an edge must be respected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strength {
    Required,
    Suggested,
    Optional,
}

impl Strength {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Suggested => "suggested",
            Self::Optional => "optional",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "required" => Some(Self::Required),
            "suggested" => Some(Self::Suggested),
            "optional" => Some(Self::Optional),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Beat {
    pub id: String,
    pub name: String,
    pub order: i64,
}

impl Beat {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
        }
    }
}

/// Directed edge `source_id -> target_id`: the target depends on the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dependency {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub dep_type: DependencyType,
    pub strength: Strength,
    pub description: Option<String>,
}

impl Dependency {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        strength: Strength,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            dep_type: DependencyType::Sequential,
            strength,
            description: None,
        }
    }

    pub fn with_type(mut self, dep_type: DependencyType) -> Self {
        self.dep_type = dep_type;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyUpdate {
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub dep_type: Option<DependencyType>,
    pub strength: Option<Strength>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
}

/// A beat together with its derived adjacency, neighbours listed in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeatSnapshot {
    pub id: String,
    pub name: String,
    pub order: i64,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FindingKind {
    Cycle,
    OrderViolation,
    Orphan,
    /// Reserved; not produced by the current checks.
    MissingPrerequisite,
    /// Reserved; not produced by the current checks.
    StrengthMismatch,
}

impl FindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cycle => "cycle",
            Self::OrderViolation => "order_violation",
            Self::Orphan => "orphan",
            Self::MissingPrerequisite => "missing_prerequisite",
            Self::StrengthMismatch => "strength_mismatch",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationFinding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub message: String,
    pub beat_ids: Vec<String>,
    pub dependency_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: usize,
    pub warnings: usize,
    pub findings: Vec<ValidationFinding>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopologicalOrder {
    pub order: Vec<String>,
    /// Placed beats only; beats caught in a cycle have no level.
    pub levels: HashMap<String, usize>,
    pub has_valid_order: bool,
    pub cycles: Vec<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImpactAnalysis {
    pub beat_id: String,
    pub directly_affected: Vec<String>,
    pub transitively_affected: Vec<String>,
    pub impact_score: u32,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReorderCheck {
    pub valid: bool,
    pub reasons: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisualNode {
    pub id: String,
    pub name: String,
    pub order: i64,
    pub level: Option<usize>,
    pub in_degree: usize,
    pub out_degree: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisualizationData {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<Dependency>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphStats {
    pub beats: usize,
    pub dependencies: usize,
    pub orphan_dependencies: usize,
    pub roots: usize,
    pub max_level: Option<usize>,
}
