use std::error::Error;

/// Errors surfaced by the solve/benchmark machinery.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SolverError {
    /// The engine did not converge within its iteration cap.
    FailedToFindASolution { iterations: usize },
    /// An unknown heuristic was requested at construction time.
    SolverNotSupported(String),
    /// A WordleBot file is logically inconsistent: two games share an
    /// identical score prefix but diverge on the next guess.
    InvalidWordleBotFile(String),
    /// Bad word length, unknown word, or malformed score string.
    InvalidInput(String),
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::FailedToFindASolution { iterations } => {
                write!(f, "Failed to converge after {iterations} iterations.")
            }
            SolverError::SolverNotSupported(name) => {
                write!(
                    f,
                    "Solver type '{name}' not recognised. Supported types are MINIMAX, ENTROPY."
                )
            }
            SolverError::InvalidWordleBotFile(detail) => {
                write!(f, "Invalid WordleBot file: {detail}")
            }
            SolverError::InvalidInput(detail) => {
                write!(f, "Invalid input: {detail}")
            }
        }
    }
}

impl Error for SolverError {}

#[cfg(test)]
mod tests {
    use super::SolverError;

    #[test]
    fn display_names_the_iteration_cap() {
        let err = SolverError::FailedToFindASolution { iterations: 20 };
        assert_eq!(err.to_string(), "Failed to converge after 20 iterations.");
    }

    #[test]
    fn display_names_the_unsupported_solver() {
        let err = SolverError::SolverNotSupported("FOO".to_string());
        assert!(err.to_string().contains("FOO"));
    }
}
