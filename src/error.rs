use thiserror::Error;

/// Result type for design and setup operations
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors raised while designing the controller or validating its inputs.
/// All of them are fatal to the setup phase.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    /// Controllability matrix [B, AB, ..., A^(n-1)B] is rank deficient or not invertible
    #[error("system is not controllable: controllability matrix has rank {rank}, expected {order}")]
    Uncontrollable { rank: usize, order: usize },

    /// The DC gain from reference to output cannot be inverted
    #[error("degenerate reference scaling: {0}")]
    DegenerateScaling(String),

    #[error("expected {expected} desired poles, got {actual}")]
    PoleCount { expected: usize, actual: usize },

    /// Desired poles do not come in complex conjugate pairs, so no real gain exists
    #[error("desired poles are not closed under complex conjugation")]
    NonConjugatePoles,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised by the renderer
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create output directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to draw chart '{chart}': {reason}")]
    Plot { chart: String, reason: String },

    #[error("history is empty, nothing to render")]
    EmptyHistory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_rank() {
        let err = ControlError::Uncontrollable { rank: 1, order: 2 };
        assert_eq!(
            err.to_string(),
            "system is not controllable: controllability matrix has rank 1, expected 2"
        );
    }
}
