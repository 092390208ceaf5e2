use serde::{Deserialize, Serialize};

/// Identifies which prime field / elliptic curve a compiled artifact is
/// bound to. Purely informational: it never changes how the solver computes,
/// only what it tags its tracing spans with, since cross-curve interop is
/// explicitly out of scope.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurveId(pub String);

impl CurveId {
    pub fn new(name: impl Into<String>) -> Self {
        CurveId(name.into())
    }
}

impl std::fmt::Display for CurveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which constraint form a builder lowers into.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BackendKind {
    R1cs,
    SparseR1cs,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::R1cs => write!(f, "r1cs"),
            BackendKind::SparseR1cs => write!(f, "sparse-r1cs"),
        }
    }
}

/// Bounds on builder and serialization behaviour.
///
/// A small, `Copy`-able struct threaded through `CircuitBuilder::new` and
/// `compile`.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CircuitConfig {
    /// Builder panics if this many internal wires would be exceeded; a
    /// circuit that needs more than this is a programming error, not
    /// recoverable input.
    pub max_internal_wires: usize,
    /// When false, log and debug-info entries are dropped during lowering to
    /// shrink the artifact.
    pub retain_debug_info: bool,
    /// Enforced by the CBOR decoder: bounds both array and map element counts.
    pub max_cbor_elements: u32,
}

impl CircuitConfig {
    /// `2^27`, per the external-interface CBOR bound.
    pub const DEFAULT_MAX_CBOR_ELEMENTS: u32 = 1 << 27;
}

impl Default for CircuitConfig {
    fn default() -> Self {
        CircuitConfig {
            max_internal_wires: usize::MAX,
            retain_debug_info: true,
            max_cbor_elements: Self::DEFAULT_MAX_CBOR_ELEMENTS,
        }
    }
}
