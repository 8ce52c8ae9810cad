use thiserror::Error;

/// A set of assignments could not be ordered as they refer to each other in
/// a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot sort cyclic references: {}", .names.join(", "))]
pub struct CyclicReferenceError {
    /// Names of the definitions on a cycle, or on a path from one cycle to
    /// another, in input order.
    pub names: Vec<String>,
}
