use uuid::Uuid;

/// The full error surface of the compiler and solver.
///
/// `thiserror`-derived rather than an `anyhow::Result`: callers across an
/// FFI-ish boundary (a proving backend, a CLI, a test harness asserting on a
/// specific failure kind) need to match on *which* variant occurred, which
/// an opaque `anyhow::Error` chain does not support.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A compiled artifact violates one of the invariants in the data model:
    /// a wire id outside its post-layout bucket, a hint keyed by the wrong
    /// wire, a coefficient table missing a reserved slot.
    #[error("structural error: {0}")]
    Structural(String),

    /// The witness prefix supplied to a solver does not match the artifact.
    #[error("invalid witness size: expected {expected}, got {actual}")]
    InvalidWitnessSize { expected: usize, actual: usize },

    /// A named input could not be found or converted to a field element.
    #[error("input error: {0}")]
    Input(String),

    /// A hint was invoked that has no registered function, or the function
    /// itself failed, or returned the wrong number of outputs.
    #[error("missing hint function: {0}")]
    MissingHintFunction(Uuid),

    #[error("hint function {uuid} failed: {message}")]
    HintFailed { uuid: Uuid, message: String },

    #[error("hint function {uuid} produced {actual} outputs, expected {expected}")]
    HintOutputMismatch {
        uuid: Uuid,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate hint registration: {0}")]
    DuplicateHint(Uuid),

    /// A constraint has no unique unknown wire: either zero wires are
    /// unsolved and the check already ran, or more than one is, meaning the
    /// circuit under-determines that constraint.
    #[error("solver error at constraint {index}: {reason}")]
    Solver { index: usize, reason: String },

    /// The field equation for a constraint evaluated to a nonzero value.
    #[error("unsatisfied constraint {index}{}", debug.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    UnsatisfiedConstraint { index: usize, debug: Option<String> },
}

pub type Result<T> = std::result::Result<T, Error>;
