use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

/// A requirement set the graph visitor could not satisfy, with the table
/// managers waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedRequirement {
    pub requires: Vec<String>,
    pub dependents: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tenant '{0}' already exists")]
    AlreadyExists(String),

    #[error(
        "Dependency graph cannot make progress; unresolved: {}; visited: [{}]",
        format_unresolved(.remaining),
        .visited.join(", ")
    )]
    DependencyGraph {
        remaining: Vec<UnresolvedRequirement>,
        visited: Vec<String>,
    },

    #[error(transparent)]
    Sql(#[from] anyhow::Error),
}

impl SetupError {
    /// Validation failures are the caller's to fix; everything else is fatal
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SetupError::InvalidArgument(_) | SetupError::AlreadyExists(_)
        )
    }
}

fn format_unresolved(remaining: &[UnresolvedRequirement]) -> String {
    remaining
        .iter()
        .map(|r| format!("[{}] --> [{}]", r.requires.join(", "), r.dependents.join(", ")))
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_graph_message_lists_requirements() {
        let err = SetupError::DependencyGraph {
            remaining: vec![UnresolvedRequirement {
                requires: vec!["b".to_string()],
                dependents: vec!["a".to_string()],
            }],
            visited: vec!["c".to_string(), "d".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Dependency graph cannot make progress; unresolved: [b] --> [a]; visited: [c, d]"
        );
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_client_errors() {
        assert!(SetupError::AlreadyExists("acme".to_string()).is_client_error());
        assert!(SetupError::InvalidArgument("bad".to_string()).is_client_error());
        assert!(!SetupError::Sql(anyhow::anyhow!("boom")).is_client_error());
    }
}
