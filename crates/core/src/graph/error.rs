#![forbid(unsafe_code)]

/// Rejected edge mutation. The graph is unchanged whenever one of these is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationError {
    Cycle {
        source_id: String,
        target_id: String,
        /// Existing chain `target -> .. -> source` the new edge would close.
        path: Vec<String>,
    },
    UnknownDependency {
        id: String,
    },
    DuplicateDependency {
        id: String,
    },
}

impl MutationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cycle { .. } => "cycle",
            Self::UnknownDependency { .. } => "unknown_dependency",
            Self::DuplicateDependency { .. } => "duplicate_dependency",
        }
    }
}

impl std::fmt::Display for MutationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cycle {
                source_id,
                target_id,
                path,
            } => {
                write!(
                    f,
                    "dependency {source_id} -> {target_id} would create a cycle"
                )?;
                if !path.is_empty() {
                    write!(f, " (existing path: {})", path.join(" -> "))?;
                }
                Ok(())
            }
            Self::UnknownDependency { id } => write!(f, "unknown dependency (id={id})"),
            Self::DuplicateDependency { id } => write!(f, "dependency already exists (id={id})"),
        }
    }
}

impl std::error::Error for MutationError {}
