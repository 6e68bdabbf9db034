use thiserror::Error; // Import the `Error` derive macro from the `thiserror` crate

/// Which side of a comparison an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

// Every way an evaluation can fail. The Display text becomes the failure reason.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    // Operand resolved to Absent
    #[error("{side} operand did not resolve")]
    Unresolved { side: Side },

    // Kinds still differ after coercion
    #[error("type mismatch: cannot compare {lhs} with {rhs}")]
    TypeMismatch { lhs: &'static str, rhs: &'static str },

    #[error("operator unsupported: {0}")]
    UnsupportedOperator(String),

    // Both operands resolved and compared, but the relation does not hold
    #[error("{0} returned false")]
    NotSatisfied(String),

    // Every child of an OR group failed
    #[error("no alternative succeeded [{}]", .0.join("; "))]
    NoAlternative(Vec<String>),

    // The single child of a NOT group succeeded
    #[error("negated expression succeeded: {0}")]
    Negated(String),

    // Logical group with the wrong number of children
    #[error("{op} expects {expected} operand(s), got {actual}")]
    Arity {
        op: &'static str,
        expected: usize,
        actual: usize,
    },
}

// Type alias for results that use `EvalError` as the error type
pub type Result<T> = std::result::Result<T, EvalError>;
